// src/services/site_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::SiteRepository,
    models::{
        auth::User,
        plan::LimitedResource,
        site::{CreatePlantPayload, CreateSitePayload, PowerPlant, Site},
    },
    services::{
        subscription_service::SubscriptionService,
        visibility::{filter_visible, Viewer, VisibilityPolicy},
    },
};

#[derive(Clone)]
pub struct SiteService {
    repo: SiteRepository,
    subscription: SubscriptionService,
}

impl SiteService {
    pub fn new(repo: SiteRepository, subscription: SubscriptionService) -> Self {
        Self { repo, subscription }
    }

    pub async fn create_site(&self, company_id: Uuid, payload: &CreateSitePayload) -> Result<Site, AppError> {
        self.subscription.enforce_limit(company_id, LimitedResource::Sites).await?;
        self.repo
            .create_site(company_id, &payload.name, payload.address.as_deref())
            .await
    }

    pub async fn list_sites(&self, company_id: Uuid, viewer: &User) -> Result<Vec<Site>, AppError> {
        let sites = self.repo.list_sites(company_id).await?;
        Ok(filter_visible(sites, &Viewer::from(viewer), VisibilityPolicy::AnyAssigned))
    }

    pub async fn delete_site(&self, company_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete_site(company_id, id).await? {
            return Err(AppError::RecordNotFound("site"));
        }
        Ok(())
    }

    pub async fn create_plant(&self, company_id: Uuid, payload: &CreatePlantPayload) -> Result<PowerPlant, AppError> {
        self.repo
            .find_site(company_id, payload.site_id)
            .await?
            .ok_or(AppError::RecordNotFound("site"))?;
        self.subscription.enforce_limit(company_id, LimitedResource::Plants).await?;

        self.repo
            .create_plant(company_id, payload.site_id, &payload.name, payload.capacity_kw)
            .await
    }

    pub async fn list_plants(&self, company_id: Uuid, viewer: &User) -> Result<Vec<PowerPlant>, AppError> {
        let plants = self.repo.list_plants(company_id).await?;
        Ok(filter_visible(plants, &Viewer::from(viewer), VisibilityPolicy::AnyAssigned))
    }

    pub async fn delete_plant(&self, company_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete_plant(company_id, id).await? {
            return Err(AppError::RecordNotFound("plant"));
        }
        Ok(())
    }
}

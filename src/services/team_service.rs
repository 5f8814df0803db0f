// src/services/team_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{user_repo::NewUser, UserRepository},
    models::{
        auth::{CreateTeamMemberPayload, Role, UpdateAssignmentsPayload, User},
        plan::LimitedResource,
    },
    services::{auth::hash_password, subscription_service::SubscriptionService},
};

/// Papéis que um gestor pode atribuir à equipe.
pub fn assignable_role(role: Role) -> Result<Role, AppError> {
    match role {
        Role::SuperAdmin => Err(AppError::InvalidRole),
        other => Ok(other),
    }
}

#[derive(Clone)]
pub struct TeamService {
    user_repo: UserRepository,
    subscription: SubscriptionService,
}

impl TeamService {
    pub fn new(user_repo: UserRepository, subscription: SubscriptionService) -> Self {
        Self { user_repo, subscription }
    }

    pub async fn create_member(&self, company_id: Uuid, payload: &CreateTeamMemberPayload) -> Result<User, AppError> {
        let role = assignable_role(payload.role)?;
        self.subscription.enforce_limit(company_id, LimitedResource::Users).await?;

        let hashed_password = hash_password(&payload.password).await?;
        let user = self
            .user_repo
            .create_user(
                self.user_repo.pool(),
                NewUser {
                    company_id,
                    email: &payload.email,
                    password_hash: &hashed_password,
                    full_name: &payload.full_name,
                    phone: payload.phone.as_deref(),
                    role,
                    sites: &payload.sites,
                    plants: &payload.plants,
                },
            )
            .await?;

        tracing::info!("👷 Novo membro {} ({:?}) na empresa {}", user.email, user.role, company_id);
        Ok(user)
    }

    pub async fn list_team(&self, company_id: Uuid) -> Result<Vec<User>, AppError> {
        self.user_repo.list_by_company(company_id).await
    }

    pub async fn update_assignments(
        &self,
        company_id: Uuid,
        user_id: Uuid,
        payload: &UpdateAssignmentsPayload,
    ) -> Result<User, AppError> {
        self.user_repo
            .update_assignments(company_id, user_id, &payload.sites, &payload.plants)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    /// Desativa o membro; o próprio usuário não pode se desativar.
    pub async fn deactivate_member(&self, company_id: Uuid, actor_id: Uuid, user_id: Uuid) -> Result<User, AppError> {
        if actor_id == user_id {
            return Err(AppError::Forbidden("team.deactivate_self"));
        }
        self.user_repo
            .set_active(company_id, user_id, false)
            .await?
            .ok_or(AppError::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn superadmin_cannot_be_assigned_by_a_company() {
        assert!(matches!(assignable_role(Role::SuperAdmin), Err(AppError::InvalidRole)));
        assert_eq!(assignable_role(Role::Guard).unwrap(), Role::Guard);
        assert_eq!(assignable_role(Role::Manager).unwrap(), Role::Manager);
    }
}

// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::Role,
};

/// O Trait que define o que é uma Permissão
pub trait PermissionDef: Send + Sync + 'static {
    fn slug() -> &'static str;
}

// Registro estático, listado em GET /api/permissions
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct PermissionInfo {
    pub slug: &'static str,
    pub description: &'static str,
}

inventory::collect!(PermissionInfo);

pub fn registered_permissions() -> Vec<PermissionInfo> {
    let mut all: Vec<PermissionInfo> = inventory::iter::<PermissionInfo>.into_iter().copied().collect();
    all.sort_by_key(|p| p.slug);
    all
}

macro_rules! permission {
    ($name:ident, $slug:literal, $description:literal) => {
        pub struct $name;

        impl PermissionDef for $name {
            fn slug() -> &'static str {
                $slug
            }
        }

        inventory::submit! {
            PermissionInfo { slug: $slug, description: $description }
        }
    };
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

permission!(PermTeamView, "team.view", "Ekibi görüntüle");
permission!(PermTeamManage, "team.manage", "Ekip üyesi ekle, ata, pasifleştir");
permission!(PermCompanySettings, "company.settings", "Şirket ve abonelik ayarları");

permission!(PermSitesView, "sites.view", "Saha ve santralleri görüntüle");
permission!(PermSitesManage, "sites.manage", "Saha ve santral ekle/sil");

permission!(PermFaultView, "faults.view", "Arızaları görüntüle");
permission!(PermFaultCreate, "faults.create", "Arıza kaydı aç");
permission!(PermFaultEdit, "faults.edit", "Arıza kaydını düzenle");
permission!(PermFaultResolve, "faults.resolve", "Arızayı çöz");
permission!(PermFaultDelete, "faults.delete", "Arıza kaydını sil");

permission!(PermMaintenanceView, "maintenance.view", "Bakım ve iş raporlarını görüntüle");
permission!(PermMaintenanceCreate, "maintenance.create", "Bakım / iş raporu oluştur");
permission!(PermMaintenanceEdit, "maintenance.edit", "Bakım / iş raporu düzenle");
permission!(PermMaintenanceDelete, "maintenance.delete", "Bakım / iş raporu sil");

permission!(PermOutageView, "outages.view", "Elektrik kesintilerini görüntüle");
permission!(PermOutageCreate, "outages.create", "Kesinti kaydı oluştur");
permission!(PermOutageEdit, "outages.edit", "Kesinti kaydını düzenle");
permission!(PermOutageDelete, "outages.delete", "Kesinti kaydını sil");

permission!(PermShiftView, "shifts.view", "Vardiya bildirimlerini görüntüle");
permission!(PermShiftCreate, "shifts.create", "Vardiya bildirimi oluştur");
permission!(PermShiftEdit, "shifts.edit", "Vardiya bildirimini düzenle");
permission!(PermShiftDelete, "shifts.delete", "Vardiya bildirimini sil");

permission!(PermStockView, "stock.view", "Stok görüntüle");
permission!(PermStockManage, "stock.manage", "Stok kalemi ekle/düzenle/sil");
permission!(PermStockMove, "stock.move", "Stok hareketi kaydet");

permission!(PermAssetView, "assets.view", "Demirbaşları görüntüle");
permission!(PermAssetManage, "assets.manage", "Demirbaş ekle/düzenle/sil");

permission!(PermReportsExport, "reports.export", "PDF / CSV dışa aktar");

permission!(PermStorageUpload, "storage.upload", "Dosya yükle / sil");
permission!(PermStorageView, "storage.view", "Depolama kullanımını görüntüle");
permission!(PermStorageRecount, "storage.recount", "Depolama kullanımını yeniden hesapla");

const MANAGER: &[&str] = &[
    "team.view", "team.manage", "company.settings",
    "sites.view", "sites.manage",
    "faults.view", "faults.create", "faults.edit", "faults.resolve", "faults.delete",
    "maintenance.view", "maintenance.create", "maintenance.edit", "maintenance.delete",
    "outages.view", "outages.create", "outages.edit", "outages.delete",
    "shifts.view", "shifts.create", "shifts.edit", "shifts.delete",
    "stock.view", "stock.manage", "stock.move",
    "assets.view", "assets.manage",
    "reports.export",
    "storage.upload", "storage.view", "storage.recount",
];

const ENGINEER: &[&str] = &[
    "team.view",
    "sites.view",
    "faults.view", "faults.create", "faults.edit", "faults.resolve",
    "maintenance.view", "maintenance.create", "maintenance.edit",
    "outages.view", "outages.create", "outages.edit",
    "shifts.view", "shifts.create", "shifts.edit",
    "stock.view", "stock.move",
    "assets.view", "assets.manage",
    "reports.export",
    "storage.upload", "storage.view",
];

const TECHNICIAN: &[&str] = &[
    "sites.view",
    "faults.view", "faults.create", "faults.edit", "faults.resolve",
    "maintenance.view", "maintenance.create", "maintenance.edit",
    "outages.view",
    "shifts.view", "shifts.create",
    "stock.view", "stock.move",
    "assets.view",
    "storage.upload",
];

const GUARD: &[&str] = &[
    "sites.view",
    "faults.view", "faults.create",
    "outages.view", "outages.create",
    "shifts.view", "shifts.create", "shifts.edit",
    "storage.upload",
];

const CUSTOMER: &[&str] = &[
    "sites.view",
    "faults.view",
    "maintenance.view",
    "outages.view",
    "shifts.view",
    "reports.export",
];

// Superadmin atua via rotas /api/admin; aqui só armazenamento
const SUPERADMIN: &[&str] = &["storage.view", "storage.recount"];

pub fn role_permissions(role: Role) -> &'static [&'static str] {
    match role {
        Role::SuperAdmin => SUPERADMIN,
        Role::Manager => MANAGER,
        Role::Engineer => ENGINEER,
        Role::Technician => TECHNICIAN,
        Role::Guard => GUARD,
        Role::Customer => CUSTOMER,
    }
}

pub fn role_has_permission(role: Role, slug: &str) -> bool {
    role_permissions(role).contains(&slug)
}

/// O Extractor (Guardião)
pub struct RequirePermission<T>(pub PhantomData<T>);

async fn current_user<S>(parts: &mut Parts, state: &S) -> Result<(AuthenticatedUser, Locale, AppState), ApiError>
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    let app_state = AppState::from_ref(state);
    let Ok(locale) = Locale::from_request_parts(parts, state).await;
    let user = parts.extensions.get::<AuthenticatedUser>().cloned().ok_or(ApiError {
        status: StatusCode::UNAUTHORIZED,
        error: "Unauthenticated".into(),
        details: None,
    })?;
    Ok((user, locale, app_state))
}

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let (user, locale, app_state) = current_user(parts, state).await?;

        let required_perm = T::slug();
        if !role_has_permission(user.0.role, required_perm) {
            return Err(AppError::Forbidden(required_perm).to_api_error(&locale, &app_state.i18n_store));
        }

        Ok(RequirePermission(PhantomData))
    }
}

/// Restringe a rota ao superadmin da plataforma.
pub struct RequireSuperAdmin;

impl<S> FromRequestParts<S> for RequireSuperAdmin
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let (user, locale, app_state) = current_user(parts, state).await?;

        if user.0.role != Role::SuperAdmin {
            return Err(AppError::Forbidden("admin").to_api_error(&locale, &app_state.i18n_store));
        }
        Ok(RequireSuperAdmin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_granted_slug_is_registered() {
        let registered: Vec<&str> = registered_permissions().iter().map(|p| p.slug).collect();
        for role in [
            Role::SuperAdmin,
            Role::Manager,
            Role::Engineer,
            Role::Technician,
            Role::Guard,
            Role::Customer,
        ] {
            for slug in role_permissions(role) {
                assert!(registered.contains(slug), "{slug} is not registered");
            }
        }
    }

    #[test]
    fn manager_holds_every_registered_permission() {
        for permission in registered_permissions() {
            assert!(role_has_permission(Role::Manager, permission.slug), "{}", permission.slug);
        }
    }

    #[test]
    fn field_roles_are_narrower() {
        assert!(role_has_permission(Role::Guard, PermFaultCreate::slug()));
        assert!(!role_has_permission(Role::Guard, PermFaultDelete::slug()));
        assert!(!role_has_permission(Role::Customer, PermFaultCreate::slug()));
        assert!(role_has_permission(Role::Customer, PermReportsExport::slug()));
        assert!(!role_has_permission(Role::SuperAdmin, PermFaultView::slug()));
        assert!(role_has_permission(Role::SuperAdmin, PermStorageRecount::slug()));
    }

    #[test]
    fn guards_file_shift_reports_but_cannot_delete_them() {
        assert!(role_has_permission(Role::Guard, PermShiftCreate::slug()));
        assert!(role_has_permission(Role::Guard, PermShiftEdit::slug()));
        assert!(!role_has_permission(Role::Guard, PermShiftDelete::slug()));
        assert!(role_has_permission(Role::Customer, PermShiftView::slug()));
        assert!(!role_has_permission(Role::Customer, PermShiftCreate::slug()));
    }
}

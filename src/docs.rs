// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::middleware;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::team::list_team,
        handlers::team::create_member,

        // --- Company ---
        handlers::company::get_company,
        handlers::company::update_company,

        // --- Sites ---
        handlers::sites::list_sites,
        handlers::sites::create_site,
        handlers::sites::list_plants,
        handlers::sites::create_plant,

        // --- Subscription ---
        handlers::subscription::get_subscription,
        handlers::subscription::get_usage,
        handlers::subscription::list_plans,
        handlers::subscription::get_feature,
        handlers::subscription::create_upgrade_request,
        handlers::subscription::list_upgrade_requests,

        // --- Payments ---
        handlers::payments::start_checkout,
        handlers::payments::confirm_checkout,

        // --- Storage ---
        handlers::storage::upload_file,
        handlers::storage::delete_file,
        handlers::storage::get_status,
        handlers::storage::recount,

        // --- Admin ---
        handlers::admin::get_plans,
        handlers::admin::save_plans,
        handlers::admin::update_plan,
        handlers::admin::list_companies,
        handlers::admin::assign_plan,
        handlers::admin::list_upgrade_requests,
        handlers::admin::approve_upgrade,
        handlers::admin::reject_upgrade,
        handlers::admin::recount_all,

        // --- RBAC ---
        handlers::rbac::list_permissions,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::CreateTeamMemberPayload,
            models::auth::UpdateAssignmentsPayload,

            // --- Company ---
            models::company::SubscriptionStatus,
            models::company::LimitOverrides,
            models::company::Company,
            models::company::UpdateCompanyPayload,

            // --- Plans ---
            models::plan::PlanLimits,
            models::plan::Plan,
            models::plan::LimitedResource,
            models::plan::LimitCheck,
            models::plan::SubscriptionState,
            models::plan::SubscriptionInfo,
            models::plan::UsageEntry,
            models::plan::UsageSummary,
            models::plan::AssignPlanPayload,

            // --- Sites ---
            models::site::Site,
            models::site::PowerPlant,
            models::site::CreateSitePayload,
            models::site::CreatePlantPayload,

            // --- Storage ---
            models::storage::StorageCategory,
            models::storage::Breakdown,
            models::storage::WarningLevel,
            models::storage::StorageStatus,
            models::storage::BreakdownMb,
            models::storage::StoredObject,
            models::storage::RecountSummary,

            // --- Upgrade / Payments ---
            models::upgrade::RequestStatus,
            models::upgrade::UpgradeRequest,
            models::upgrade::CreateUpgradeRequestPayload,
            models::upgrade::RejectUpgradePayload,
            models::payment::PaymentStatus,
            models::payment::PaymentSession,
            models::payment::StartCheckoutPayload,
            models::payment::ConfirmCheckoutPayload,

            // --- RBAC ---
            middleware::rbac::PermissionInfo,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Equipe"),
        (name = "Company", description = "Dados da Empresa"),
        (name = "Sites", description = "Sahalar e Santraller"),
        (name = "Subscription", description = "Plano, Limites e Pedidos de Upgrade"),
        (name = "Payments", description = "Checkout Simulado"),
        (name = "Storage", description = "Arquivos e Cota de Armazenamento"),
        (name = "Admin", description = "Administração da Plataforma"),
        (name = "RBAC", description = "Controle de Acesso (Permissões)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_storage_and_admin_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/storage/upload"));
        assert!(doc.paths.paths.contains_key("/api/admin/upgrade-requests/{id}/approve"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("api_jwt"));
    }
}

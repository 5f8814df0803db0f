// src/handlers/team.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermTeamManage, PermTeamView, RequirePermission},
        tenancy::TenantContext,
    },
    models::auth::{CreateTeamMemberPayload, UpdateAssignmentsPayload, User},
};

// GET /api/users/team
#[utoipa::path(
    get,
    path = "/api/users/team",
    tag = "Users",
    responses((status = 200, description = "Membros da empresa", body = [User])),
    security(("api_jwt" = []))
)]
pub async fn list_team(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePermission<PermTeamView>,
) -> Result<impl IntoResponse, ApiError> {
    let team = app_state
        .team_service
        .list_team(tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(team))
}

// POST /api/users/team
#[utoipa::path(
    post,
    path = "/api/users/team",
    tag = "Users",
    request_body = CreateTeamMemberPayload,
    responses(
        (status = 201, description = "Membro criado", body = User),
        (status = 402, description = "Limite de usuários do plano atingido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_member(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePermission<PermTeamManage>,
    Json(payload): Json<CreateTeamMemberPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let member = app_state
        .team_service
        .create_member(tenant.0, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(member)))
}

// PUT /api/users/team/{user_id}/assignments
pub async fn update_assignments(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePermission<PermTeamManage>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateAssignmentsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let member = app_state
        .team_service
        .update_assignments(tenant.0, user_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(member))
}

// POST /api/users/team/{user_id}/deactivate
pub async fn deactivate_member(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermTeamManage>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let member = app_state
        .team_service
        .deactivate_member(tenant.0, user.0.id, user_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(member))
}

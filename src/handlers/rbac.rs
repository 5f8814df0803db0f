// src/handlers/rbac.rs

use axum::Json;

use crate::middleware::rbac::{registered_permissions, PermissionInfo};

// GET /api/permissions
#[utoipa::path(
    get,
    path = "/api/permissions",
    tag = "RBAC",
    responses((status = 200, description = "Permissões registradas no sistema", body = [PermissionInfo]))
)]
pub async fn list_permissions() -> Json<Vec<PermissionInfo>> {
    Json(registered_permissions())
}

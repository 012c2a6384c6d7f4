use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use clubhouse_core::authorization::{policy, PermissionMatrix, Role, UserId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    api::{
        error::AppError,
        middleware::authorization::{enforce, Identity},
    },
    app_state::SharedAppState,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleInfo {
    pub name: Role,
    pub rank: u8,
    pub description: String,
    pub active: bool,
    pub permissions: PermissionMatrix,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolesListResponse {
    pub roles: Vec<RoleInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleChangeResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetPermissionRequest {
    pub section: String,
    pub action: String,
    pub allowed: bool,
}

fn parse_role(name: &str) -> Result<Role, AppError> {
    name.parse::<Role>()
        .map_err(|_| AppError::UnknownRole(name.to_string()))
}

pub async fn list_roles_handler(
    State(state): State<SharedAppState>,
    Identity(ctx): Identity,
) -> Result<impl IntoResponse, AppError> {
    let catalog = state.roles.snapshot().await;
    enforce(
        &state,
        "list_roles",
        &ctx,
        policy::has_permission(&ctx, &catalog, "roles", "view"),
    )
    .await?;

    let roles = catalog
        .iter()
        .map(|(role, def)| RoleInfo {
            name: role,
            rank: role.rank(),
            description: def.description.clone(),
            active: def.active,
            permissions: def.permissions.clone(),
        })
        .collect();

    Ok(Json(RolesListResponse { roles }))
}

pub async fn activate_role_handler(
    State(state): State<SharedAppState>,
    Identity(ctx): Identity,
    Path(role): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    set_role_active(state, ctx.user_id(), &role, true).await
}

pub async fn deactivate_role_handler(
    State(state): State<SharedAppState>,
    Identity(ctx): Identity,
    Path(role): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    set_role_active(state, ctx.user_id(), &role, false).await
}

async fn set_role_active(
    state: SharedAppState,
    user_id: Option<UserId>,
    role: &str,
    active: bool,
) -> Result<Json<RoleChangeResponse>, AppError> {
    let role = parse_role(role)?;
    let changed = state.roles.set_role_active(role, active).await?;

    let state_name = if active { "active" } else { "inactive" };
    info!(role = %role, ?user_id, changed, "Role set {}", state_name);

    let message = if changed {
        format!("Role '{}' is now {}", role, state_name)
    } else {
        format!("Role '{}' was already {}", role, state_name)
    };

    Ok(Json(RoleChangeResponse {
        success: true,
        message,
    }))
}

pub async fn set_permission_handler(
    State(state): State<SharedAppState>,
    Identity(ctx): Identity,
    Path(role): Path<String>,
    Json(payload): Json<SetPermissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let role = parse_role(&role)?;

    state
        .roles
        .set_permission(role, &payload.section, &payload.action, payload.allowed)
        .await?;

    info!(
        role = %role,
        section = %payload.section,
        action = %payload.action,
        allowed = payload.allowed,
        user_id = ?ctx.user_id(),
        "Role permission changed"
    );

    Ok(Json(RoleChangeResponse {
        success: true,
        message: format!(
            "Role '{}' {} {} on {}",
            role,
            if payload.allowed { "may" } else { "may not" },
            payload.action,
            payload.section
        ),
    }))
}

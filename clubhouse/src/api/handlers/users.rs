use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use clubhouse_core::authorization::{policy, UserId};
use tracing::info;

use crate::{
    api::{
        error::AppError,
        middleware::authorization::{enforce, Identity},
    },
    app_state::SharedAppState,
    services::directory::UserUpdate,
};

pub async fn get_user_handler(
    State(state): State<SharedAppState>,
    Identity(ctx): Identity,
    Path(user_id): Path<UserId>,
) -> Result<impl IntoResponse, AppError> {
    enforce(&state, "view_user", &ctx, policy::can_view_user(&ctx, user_id)).await?;

    let user = state
        .directory
        .user(user_id)
        .await
        .ok_or(AppError::UserNotFound(user_id))?;

    Ok(Json(user))
}

pub async fn update_user_handler(
    State(state): State<SharedAppState>,
    Identity(ctx): Identity,
    Path(user_id): Path<UserId>,
    Json(update): Json<UserUpdate>,
) -> Result<impl IntoResponse, AppError> {
    enforce(&state, "edit_user", &ctx, policy::can_edit_user(&ctx, user_id)).await?;

    let user = state
        .directory
        .update_user(user_id, update)
        .await?
        .ok_or(AppError::UserNotFound(user_id))?;

    info!(target_user_id = user_id, user_id = ?ctx.user_id(), "User updated");
    Ok(Json(user))
}

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use clubhouse_core::authorization::{policy, ClubId};
use tracing::info;

use crate::{
    api::{
        error::AppError,
        middleware::authorization::{enforce, Identity},
    },
    app_state::SharedAppState,
    services::directory::ClubUpdate,
};

pub async fn get_club_handler(
    State(state): State<SharedAppState>,
    Identity(ctx): Identity,
    Path(club_id): Path<ClubId>,
) -> Result<impl IntoResponse, AppError> {
    let catalog = state.roles.snapshot().await;
    enforce(
        &state,
        "view_club",
        &ctx,
        policy::has_permission(&ctx, &catalog, "clubs", "view"),
    )
    .await?;

    let club = state
        .directory
        .club(club_id)
        .await
        .ok_or(AppError::ClubNotFound(club_id))?;

    Ok(Json(club))
}

pub async fn update_club_handler(
    State(state): State<SharedAppState>,
    Identity(ctx): Identity,
    Path(club_id): Path<ClubId>,
    Json(update): Json<ClubUpdate>,
) -> Result<impl IntoResponse, AppError> {
    enforce(&state, "edit_club", &ctx, policy::can_manage_club(&ctx, club_id)).await?;

    let club = state
        .directory
        .update_club(club_id, update)
        .await?
        .ok_or(AppError::ClubNotFound(club_id))?;

    info!(club_id, user_id = ?ctx.user_id(), "Club updated");
    Ok(Json(club))
}

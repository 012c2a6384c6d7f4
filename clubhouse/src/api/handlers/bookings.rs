use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use clubhouse_core::authorization::policy;

use crate::{
    api::{
        error::AppError,
        middleware::authorization::{enforce, Identity},
    },
    app_state::SharedAppState,
    services::directory::BookingId,
};

pub async fn get_booking_handler(
    State(state): State<SharedAppState>,
    Identity(ctx): Identity,
    Path(booking_id): Path<BookingId>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .directory
        .booking(booking_id)
        .await
        .ok_or(AppError::BookingNotFound(booking_id))?;

    let club_id = state.directory.booking_club_id(&booking).await;
    enforce(
        &state,
        "view_booking",
        &ctx,
        policy::can_view_booking(&ctx, booking.user_id, club_id),
    )
    .await?;

    Ok(Json(booking))
}

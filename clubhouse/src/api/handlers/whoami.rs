use axum::{response::IntoResponse, Json};
use clubhouse_core::authorization::{ClubId, Role, UserId};
use serde::Serialize;

use crate::api::middleware::authorization::Identity;

#[derive(Debug, Clone, Serialize)]
pub struct WhoAmIResponse {
    pub user_id: Option<UserId>,
    pub roles: Vec<Role>,
    pub effective_role: Option<Role>,
    pub managed_club_id: Option<ClubId>,
}

pub async fn whoami_handler(Identity(ctx): Identity) -> impl IntoResponse {
    // Most privileged first
    let mut roles: Vec<Role> = ctx.roles().collect();
    roles.reverse();

    Json(WhoAmIResponse {
        user_id: ctx.user_id(),
        roles,
        effective_role: ctx.effective_role(),
        managed_club_id: ctx.managed_club_id(),
    })
}

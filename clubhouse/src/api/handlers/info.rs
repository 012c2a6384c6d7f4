use axum::{debug_handler, extract::State, response::IntoResponse, Json};
use clubhouse_core::settings::api_server::AuthMode;

use crate::app_state::SharedAppState;

#[debug_handler]
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

#[debug_handler]
pub async fn info_handler(State(state): State<SharedAppState>) -> impl IntoResponse {
    let json_response = serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "auth_mode": match state.settings.api.auth_mode {
            AuthMode::Development => "dev",
            AuthMode::Bearer => "bearer",
        },
    });
    Json(json_response)
}

use axum::{
    extract::{Request, State},
    http,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::api::auth_core::resolve_principal;
use crate::app_state::SharedAppState;

/// Attach the request's principal, if any, as a request extension.
///
/// Never rejects: requests without a principal continue and are turned away
/// by the gate of the operation they target.
pub async fn auth(State(state): State<SharedAppState>, mut req: Request, next: Next) -> Response {
    debug!(
        "Auth middleware triggered with mode: {:?}",
        state.settings.api.auth_mode
    );

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok());

    if let Some(principal) = resolve_principal(&state, auth_header) {
        req.extensions_mut().insert(principal);
    }

    next.run(req).await
}

use clubhouse_core::authorization::Principal;
use clubhouse_core::settings::api_server::AuthMode;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::app_state::SharedAppState;

/// Resolve the principal for a request based on the configured auth mode.
///
/// Accepts the header value with or without the "Bearer " prefix. Returns
/// `None` when no principal can be established; rejecting the request is left
/// to the gate, so every denial goes through the same path.
pub fn resolve_principal(state: &SharedAppState, auth_header: Option<&str>) -> Option<Principal> {
    match state.settings.api.auth_mode {
        AuthMode::Development => Some(state.settings.api.dev_principal.to_principal()),
        AuthMode::Bearer => {
            let Some(auth_header) = auth_header else {
                debug!("No Authorization header present");
                return None;
            };
            let token = auth_header.strip_prefix("Bearer ").unwrap_or(auth_header);
            authorize_bearer_token(state, token)
        }
    }
}

fn authorize_bearer_token(state: &SharedAppState, token: &str) -> Option<Principal> {
    match find_token_identifier(state, token) {
        Some(identifier) => {
            debug!("Bearer token matched identifier '{}'", identifier);
            state
                .settings
                .api
                .bearer_tokens
                .get(&identifier)
                .map(|identity| identity.claims.to_principal())
        }
        None => {
            warn!("Bearer token did not match any configured identity");
            None
        }
    }
}

fn find_token_identifier(state: &SharedAppState, token: &str) -> Option<String> {
    if token.is_empty() {
        return None;
    }

    let mut found = None;
    // Compare against every token so timing does not reveal the match position
    for (identifier, identity) in &state.settings.api.bearer_tokens {
        let expected = identity.token.expose_secret();
        if expected.is_empty() {
            continue;
        }
        let matches: bool = token.as_bytes().ct_eq(expected.as_bytes()).into();
        if matches && found.is_none() {
            found = Some(identifier.clone());
        }
    }
    found
}

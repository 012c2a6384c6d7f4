use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use clubhouse_core::authorization::{
    Decision, DecisionRecord, IdentityContext, OperationPolicy, Principal, RequestGate,
};
use std::{future::Future, pin::Pin};
use tracing::{debug, warn};

use crate::{api::error::AppError, app_state::SharedAppState};

/// Middleware factory running the request gate for one operation.
///
/// The gate checks authentication and the allowed-role set only; the wrapped
/// handler is not invoked unless the gate authorizes. Every outcome is handed
/// to the audit sink.
pub fn require_roles(
    operation: &'static str,
    policy: OperationPolicy,
) -> impl Fn(
    State<SharedAppState>,
    Request,
    Next,
) -> Pin<Box<dyn Future<Output = Result<Response, AppError>> + Send>>
       + Clone {
    move |State(state): State<SharedAppState>, req: Request, next: Next| {
        let policy = policy.clone();
        Box::pin(async move {
            let outcome = {
                let principal = req.extensions().get::<Principal>();
                RequestGate::evaluate(principal, &policy)
            };

            record_decision(&state, DecisionRecord::from_gate(operation, &outcome)).await;

            let identity = outcome.into_result()?;
            debug!(
                operation,
                user_id = ?identity.user_id(),
                "Gate passed"
            );

            Ok::<_, AppError>(next.run(req).await)
        })
    }
}

/// Identity of the acting user, derived fresh from the request's principal
#[derive(Debug, Clone)]
pub struct Identity(pub IdentityContext);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Principal>() {
            Some(principal) if principal.is_authenticated() => {
                Ok(Identity(IdentityContext::from_principal(principal)))
            }
            _ => Err(AppError::Unauthenticated),
        }
    }
}

/// Record a resource-level decision and turn a denial into the boundary error
pub async fn enforce(
    state: &SharedAppState,
    operation: &str,
    ctx: &IdentityContext,
    decision: Decision,
) -> Result<(), AppError> {
    record_decision(state, DecisionRecord::from_decision(operation, ctx, &decision)).await;

    if let Decision::Deny(reason) = decision {
        warn!(
            operation,
            user_id = ?ctx.user_id(),
            reason = %reason,
            "Access denied"
        );
    }

    decision.into_result().map_err(AppError::from)
}

async fn record_decision(state: &SharedAppState, record: DecisionRecord) {
    if let Err(e) = state.audit.record(&record).await {
        warn!("Failed to record access decision: {}", e);
    }
}

//! Coarse request gate run before a protected operation.
//!
//! The gate only checks authentication and the operation's allowed-role set.
//! Resource-scoped checks (club scoping, ownership) stay with the handler, which
//! calls into [`super::policy`] with the identity the gate hands over.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, warn};

use super::decision::{Decision, Denial, DenialReason};
use super::identity::{IdentityContext, Principal};
use super::role::Role;

/// Terminal state of one gate evaluation
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum GateState {
    Unauthenticated,
    AuthenticatedUnauthorized,
    Authorized,
}

/// Roles an operation accepts.
///
/// `None` admits every authenticated actor; an empty set admits nobody.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationPolicy {
    allowed_roles: Option<BTreeSet<Role>>,
}

impl OperationPolicy {
    /// Any authenticated actor
    pub fn authenticated() -> Self {
        Self {
            allowed_roles: None,
        }
    }

    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed_roles: Some(roles.into_iter().collect()),
        }
    }

    /// Roles ranked at or above `minimum`
    pub fn at_least(minimum: Role) -> Self {
        Self::roles(Role::all().into_iter().filter(|role| role.is_at_least(minimum)))
    }

    pub fn allowed_roles(&self) -> Option<&BTreeSet<Role>> {
        self.allowed_roles.as_ref()
    }

    fn admits(&self, ctx: &IdentityContext) -> bool {
        match &self.allowed_roles {
            None => true,
            Some(allowed) => ctx.roles().any(|role| allowed.contains(&role)),
        }
    }
}

/// Result of running the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateOutcome {
    pub state: GateState,
    /// Present once the principal is authenticated
    pub identity: Option<IdentityContext>,
    pub decision: Decision,
}

impl GateOutcome {
    pub fn denial(&self) -> Option<Denial> {
        self.decision.reason().map(Denial::from)
    }

    /// Identity of an authorized actor, or the denial to return
    pub fn into_result(self) -> Result<IdentityContext, Denial> {
        match (self.decision, self.identity) {
            (Decision::Allow, Some(identity)) => Ok(identity),
            (Decision::Deny(reason), _) => Err(Denial::from(reason)),
            (Decision::Allow, None) => Err(Denial::from(DenialReason::NotAuthenticated)),
        }
    }
}

pub struct RequestGate;

impl RequestGate {
    pub fn evaluate(principal: Option<&Principal>, policy: &OperationPolicy) -> GateOutcome {
        let principal = match principal {
            Some(principal) if principal.is_authenticated() => principal,
            _ => {
                debug!("Gate: no authenticated principal");
                return GateOutcome {
                    state: GateState::Unauthenticated,
                    identity: None,
                    decision: Decision::Deny(DenialReason::NotAuthenticated),
                };
            }
        };

        let identity = IdentityContext::from_principal(principal);

        if !policy.admits(&identity) {
            warn!(
                user_id = ?identity.user_id(),
                roles = ?identity.roles().collect::<Vec<_>>(),
                allowed = ?policy.allowed_roles(),
                "Gate: role not allowed"
            );
            return GateOutcome {
                state: GateState::AuthenticatedUnauthorized,
                identity: Some(identity),
                decision: Decision::Deny(DenialReason::RoleNotAllowed),
            };
        }

        GateOutcome {
            state: GateState::Authorized,
            identity: Some(identity),
            decision: Decision::Allow,
        }
    }

    /// Run `handler` only if the gate authorizes the principal
    pub fn guard<T>(
        principal: Option<&Principal>,
        policy: &OperationPolicy,
        handler: impl FnOnce(IdentityContext) -> T,
    ) -> Result<T, Denial> {
        Self::evaluate(principal, policy)
            .into_result()
            .map(handler)
    }
}

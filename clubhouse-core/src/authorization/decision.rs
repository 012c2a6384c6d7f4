use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a request or a resource check was denied
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DenialReason {
    /// No authenticated principal present
    NotAuthenticated,
    /// Authenticated, but none of the operation's allowed roles is held
    RoleNotAllowed,
    /// Club scoping or ownership check failed
    ResourceScopeDenied,
    /// A claim needed for the check could not be parsed
    MalformedClaim,
}

/// Protocol-agnostic status class of a denial, mapped to 401/403 at the HTTP boundary
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StatusClass {
    Unauthenticated,
    Forbidden,
}

impl DenialReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenialReason::NotAuthenticated => "not_authenticated",
            DenialReason::RoleNotAllowed => "role_not_allowed",
            DenialReason::ResourceScopeDenied => "resource_scope_denied",
            DenialReason::MalformedClaim => "malformed_claim",
        }
    }

    pub fn status_class(&self) -> StatusClass {
        match self {
            DenialReason::NotAuthenticated => StatusClass::Unauthenticated,
            _ => StatusClass::Forbidden,
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single access evaluation
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenialReason),
}

impl Decision {
    pub fn allow_if(condition: bool, reason: DenialReason) -> Self {
        if condition {
            Decision::Allow
        } else {
            Decision::Deny(reason)
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn is_denied(&self) -> bool {
        !self.is_allowed()
    }

    pub fn reason(&self) -> Option<DenialReason> {
        match self {
            Decision::Allow => None,
            Decision::Deny(reason) => Some(*reason),
        }
    }

    /// Convert into a result suitable for `?` at the boundary
    pub fn into_result(self) -> Result<(), Denial> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(Denial::from(reason)),
        }
    }
}

/// Structured denial handed to the boundary layer.
///
/// The message never names the rule that failed.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Denial {
    pub status: StatusClass,
    pub reason: DenialReason,
    pub message: &'static str,
}

pub const AUTHENTICATION_REQUIRED: &str = "authentication required";
pub const INSUFFICIENT_PRIVILEGES: &str = "insufficient privileges";

impl From<DenialReason> for Denial {
    fn from(reason: DenialReason) -> Self {
        let status = reason.status_class();
        let message = match status {
            StatusClass::Unauthenticated => AUTHENTICATION_REQUIRED,
            StatusClass::Forbidden => INSUFFICIENT_PRIVILEGES,
        };
        Denial {
            status,
            reason,
            message,
        }
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

impl std::error::Error for Denial {}

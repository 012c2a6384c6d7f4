use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Built-in roles, ordered from least to most privileged.
///
/// The derived `Ord` follows declaration order, so `Role::SuperAdmin > Role::User`
/// holds and `max()` over a set of roles yields the effective role.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum Role {
    User,
    Manager,
    Admin,
    SuperAdmin,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown role: {0}")]
pub struct RoleParseError(pub String);

impl Role {
    /// Get all built-in roles, most privileged first
    pub fn all() -> [Role; 4] {
        [Role::SuperAdmin, Role::Admin, Role::Manager, Role::User]
    }

    /// Canonical role name as it appears in role claims and in the role catalog
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SuperAdmin",
            Role::Admin => "Admin",
            Role::Manager => "Manager",
            Role::User => "User",
        }
    }

    /// Privilege rank, only meaningful for "X or higher" comparisons
    pub fn rank(&self) -> u8 {
        match self {
            Role::User => 1,
            Role::Manager => 2,
            Role::Admin => 3,
            Role::SuperAdmin => 4,
        }
    }

    /// Returns true if this role is at least as privileged as `other`
    pub fn is_at_least(&self, other: Role) -> bool {
        self.rank() >= other.rank()
    }

    pub fn description(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "Full control including the role catalog",
            Role::Admin => "Administers all clubs, users and bookings",
            Role::Manager => "Manages a single club",
            Role::User => "Books seats and manages own bookings",
        }
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    /// Role claims are matched case-insensitively; `super_admin` and `superadmin`
    /// are both accepted for `SuperAdmin`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "").as_str() {
            "superadmin" => Ok(Role::SuperAdmin),
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "user" => Ok(Role::User),
            _ => Err(RoleParseError(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check whether `name` denotes one of the built-in roles
pub fn is_known_role(name: &str) -> bool {
    name.parse::<Role>().is_ok()
}

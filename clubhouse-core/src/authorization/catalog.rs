use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use super::matrix::{PermissionMatrix, ACTIONS, SECTIONS};
use super::role::Role;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown permission section: {0}")]
    UnknownSection(String),

    #[error("Unknown permission action: {0}")]
    UnknownAction(String),
}

/// Catalog entry for one role
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoleDefinition {
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub permissions: PermissionMatrix,
}

fn default_active() -> bool {
    true
}

impl RoleDefinition {
    fn builtin(role: Role) -> Self {
        Self {
            description: role.description().to_string(),
            active: true,
            created_at: Utc::now(),
            permissions: default_permissions(role),
        }
    }
}

/// Process-wide role configuration.
///
/// All four built-in roles are always present. Roles can be deactivated but never
/// removed; an inactive role grants nothing through its permission matrix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "CatalogFile", into = "CatalogFile")]
pub struct RoleCatalog {
    roles: BTreeMap<Role, RoleDefinition>,
}

/// On-disk shape of the catalog
#[derive(Serialize, Deserialize)]
struct CatalogFile {
    roles: BTreeMap<Role, RoleDefinition>,
}

impl From<CatalogFile> for RoleCatalog {
    fn from(file: CatalogFile) -> Self {
        RoleCatalog::from_definitions(file.roles)
    }
}

impl From<RoleCatalog> for CatalogFile {
    fn from(catalog: RoleCatalog) -> Self {
        CatalogFile {
            roles: catalog.roles,
        }
    }
}

impl Default for RoleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RoleCatalog {
    /// Catalog seeded with the built-in roles and their default matrices
    pub fn builtin() -> Self {
        Self {
            roles: Role::all()
                .into_iter()
                .map(|role| (role, RoleDefinition::builtin(role)))
                .collect(),
        }
    }

    /// Build a catalog from loaded definitions, re-seeding any missing built-in role
    pub fn from_definitions(roles: BTreeMap<Role, RoleDefinition>) -> Self {
        let mut catalog = Self { roles };
        catalog.ensure_builtin();
        catalog
    }

    /// Insert defaults for built-in roles that are missing; returns the re-seeded roles
    pub fn ensure_builtin(&mut self) -> Vec<Role> {
        let mut seeded = Vec::new();
        for role in Role::all() {
            if !self.roles.contains_key(&role) {
                self.roles.insert(role, RoleDefinition::builtin(role));
                seeded.push(role);
            }
        }
        seeded
    }

    pub fn get(&self, role: Role) -> Option<&RoleDefinition> {
        self.roles.get(&role)
    }

    /// Roles ordered most privileged first
    pub fn iter(&self) -> impl Iterator<Item = (Role, &RoleDefinition)> {
        self.roles.iter().rev().map(|(role, def)| (*role, def))
    }

    pub fn is_active(&self, role: Role) -> bool {
        self.roles.get(&role).map(|def| def.active).unwrap_or(false)
    }

    /// Matrix lookup for a single role; inactive roles are denied
    pub fn is_allowed(&self, role: Role, section: &str, action: &str) -> bool {
        self.roles
            .get(&role)
            .filter(|def| def.active)
            .map(|def| def.permissions.is_allowed(section, action))
            .unwrap_or(false)
    }

    /// Returns true if the flag changed
    pub fn set_active(&mut self, role: Role, active: bool) -> bool {
        let def = self
            .roles
            .entry(role)
            .or_insert_with(|| RoleDefinition::builtin(role));
        let changed = def.active != active;
        def.active = active;
        changed
    }

    pub fn set_permission(
        &mut self,
        role: Role,
        section: &str,
        action: &str,
        allowed: bool,
    ) -> Result<(), CatalogError> {
        if !SECTIONS.contains(&section) {
            return Err(CatalogError::UnknownSection(section.to_string()));
        }
        if !ACTIONS.contains(&action) {
            return Err(CatalogError::UnknownAction(action.to_string()));
        }

        self.roles
            .entry(role)
            .or_insert_with(|| RoleDefinition::builtin(role))
            .permissions
            .set(section, action, allowed);
        Ok(())
    }
}

/// Default permission matrix for a built-in role
pub fn default_permissions(role: Role) -> PermissionMatrix {
    match role {
        Role::SuperAdmin => PermissionMatrix::granting(&SECTIONS, &ACTIONS),
        Role::Admin => PermissionMatrix::granting(
            &[
                "clubs",
                "halls",
                "seats",
                "bookings",
                "payments",
                "notifications",
                "users",
            ],
            &ACTIONS,
        )
        .with("roles", "view", true),
        Role::Manager => PermissionMatrix::granting(&["halls", "seats"], &ACTIONS)
            .with("clubs", "view", true)
            .with("clubs", "edit", true)
            .with("bookings", "view", true)
            .with("bookings", "edit", true)
            .with("payments", "view", true)
            .with("notifications", "view", true)
            .with("notifications", "create", true)
            .with("users", "view", true),
        Role::User => PermissionMatrix::granting(&["clubs", "halls", "seats"], &["view"])
            .with("bookings", "view", true)
            .with("bookings", "create", true)
            .with("payments", "view", true)
            .with("payments", "create", true)
            .with("notifications", "view", true),
    }
}

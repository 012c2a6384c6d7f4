use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sections of the platform covered by the permission matrix
pub const SECTIONS: [&str; 8] = [
    "clubs",
    "halls",
    "seats",
    "bookings",
    "payments",
    "notifications",
    "users",
    "roles",
];

/// Actions that can be granted per section
pub const ACTIONS: [&str; 4] = ["view", "create", "edit", "delete"];

/// Per-role permission matrix: section -> action -> allowed.
///
/// Lookups are fail-closed: a missing section or action is a denial.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct PermissionMatrix(BTreeMap<String, BTreeMap<String, bool>>);

impl PermissionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matrix granting every known action on the given sections
    pub fn granting(sections: &[&str], actions: &[&str]) -> Self {
        let mut matrix = Self::new();
        for section in sections {
            for action in actions {
                matrix.set(section, action, true);
            }
        }
        matrix
    }

    /// Builder-style variant of [`PermissionMatrix::set`]
    pub fn with(mut self, section: &str, action: &str, allowed: bool) -> Self {
        self.set(section, action, allowed);
        self
    }

    pub fn set(&mut self, section: &str, action: &str, allowed: bool) {
        self.0
            .entry(section.to_string())
            .or_default()
            .insert(action.to_string(), allowed);
    }

    pub fn is_allowed(&self, section: &str, action: &str) -> bool {
        self.0
            .get(section)
            .and_then(|actions| actions.get(action))
            .copied()
            .unwrap_or(false)
    }

    /// Actions explicitly allowed for a section, in sorted order
    pub fn allowed_actions(&self, section: &str) -> Vec<&str> {
        self.0
            .get(section)
            .map(|actions| {
                actions
                    .iter()
                    .filter(|(_, allowed)| **allowed)
                    .map(|(action, _)| action.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

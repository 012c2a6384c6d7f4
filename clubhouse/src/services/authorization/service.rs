use anyhow::Result;
use clubhouse_core::authorization::{Role, RoleCatalog, RoleDefinition};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use super::config::CatalogStore;

/// Live role catalog.
///
/// Readers take a cheap `Arc` snapshot and never observe a half-applied change.
/// Writers are serialized: they clone the current catalog, apply their change,
/// persist it and only then swap the pointer.
#[derive(Debug)]
pub struct RoleCatalogService {
    catalog: RwLock<Arc<RoleCatalog>>,
    writer: Mutex<()>,
    /// `None` keeps changes in memory only
    catalog_path: Option<String>,
}

impl RoleCatalogService {
    pub async fn new(catalog_path: &str) -> Result<Self> {
        let catalog = CatalogStore::load(catalog_path).await?;

        info!(
            "Role catalog initialized with {} roles ({} active)",
            catalog.iter().count(),
            catalog.iter().filter(|(_, def)| def.active).count()
        );

        Ok(Self::from_parts(catalog, Some(catalog_path.to_string())))
    }

    /// Catalog that is never written to disk
    pub fn in_memory(catalog: RoleCatalog) -> Self {
        Self::from_parts(catalog, None)
    }

    fn from_parts(catalog: RoleCatalog, catalog_path: Option<String>) -> Self {
        Self {
            catalog: RwLock::new(Arc::new(catalog)),
            writer: Mutex::new(()),
            catalog_path,
        }
    }

    pub async fn snapshot(&self) -> Arc<RoleCatalog> {
        self.catalog.read().await.clone()
    }

    /// Roles with their definitions, most privileged first
    pub async fn list_roles(&self) -> Vec<(Role, RoleDefinition)> {
        self.snapshot()
            .await
            .iter()
            .map(|(role, def)| (role, def.clone()))
            .collect()
    }

    /// Returns true if the active flag changed
    pub async fn set_role_active(&self, role: Role, active: bool) -> Result<bool> {
        let changed = self
            .update(|catalog| Ok(catalog.set_active(role, active)))
            .await?;

        if changed {
            info!(role = %role, active, "Role activation changed");
        }
        Ok(changed)
    }

    pub async fn set_permission(
        &self,
        role: Role,
        section: &str,
        action: &str,
        allowed: bool,
    ) -> Result<()> {
        self.update(|catalog| Ok(catalog.set_permission(role, section, action, allowed)?))
            .await?;

        info!(
            role = %role,
            section,
            action,
            allowed,
            "Role permission updated"
        );
        Ok(())
    }

    async fn update<T>(&self, change: impl FnOnce(&mut RoleCatalog) -> Result<T>) -> Result<T> {
        let _writer = self.writer.lock().await;

        let mut next = RoleCatalog::clone(&*self.snapshot().await);
        let result = change(&mut next)?;

        if let Some(path) = &self.catalog_path {
            CatalogStore::save(&next, path).await?;
        }

        *self.catalog.write().await = Arc::new(next);
        Ok(result)
    }
}

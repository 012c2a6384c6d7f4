use anyhow::{Context, Result};
use clubhouse_core::authorization::RoleCatalog;
use std::path::Path;
use tracing::{info, warn};

/// Loading and saving of the role catalog file
pub struct CatalogStore;

impl CatalogStore {
    /// Load the catalog from YAML; a missing file yields the built-in roles
    pub async fn load(path: &str) -> Result<RoleCatalog> {
        if !Path::new(path).exists() {
            warn!("Role catalog not found at {}, using built-in roles", path);
            return Ok(RoleCatalog::builtin());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .context("Failed to read role catalog")?;

        let catalog: RoleCatalog =
            serde_norway::from_str(&content).context("Failed to parse role catalog")?;
        info!("Loaded role catalog from {}", path);

        Ok(catalog)
    }

    pub async fn save(catalog: &RoleCatalog, path: &str) -> Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .context("Failed to create role catalog directory")?;
            }
        }

        let yaml = serde_norway::to_string(catalog)?;
        tokio::fs::write(path, yaml)
            .await
            .context("Failed to save role catalog")?;
        Ok(())
    }
}

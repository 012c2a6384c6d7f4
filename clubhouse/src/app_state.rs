use std::sync::Arc;

use anyhow::Context;
use clubhouse_core::authorization::RoleCatalog;
use tracing::info;

use crate::services::{
    AuditSink, Directory, InMemoryDirectory, LogAuditSink, MemoryAuditSink, RoleCatalogService,
};
use crate::settings::config::Settings;
use crate::stop_flag;

#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Settings,
    pub stop_flag: stop_flag::StopFlag,
    pub roles: Arc<RoleCatalogService>,
    pub directory: Arc<dyn Directory>,
    pub audit: Arc<dyn AuditSink>,
}

pub type SharedAppState = Arc<AppState>;

impl AppState {
    pub async fn from_settings(settings: Settings) -> anyhow::Result<SharedAppState> {
        let stop_flag = stop_flag::StopFlag::new();
        stop_flag::register_signal_handler(&stop_flag);

        // A catalog file that exists but does not parse is fatal; running on the
        // built-in grants would restore permissions the operator revoked
        let roles_file = settings.authorization.roles_file.clone();
        let roles = RoleCatalogService::new(&roles_file)
            .await
            .with_context(|| format!("Failed to load role catalog from '{}'", roles_file))?;

        let directory = match &settings.directory.seed_file {
            Some(seed_file) => InMemoryDirectory::load(seed_file).await?,
            None => {
                info!("No directory seed configured, starting empty");
                InMemoryDirectory::new()
            }
        };

        Ok(Self::with_services(
            settings,
            stop_flag,
            Arc::new(roles),
            Arc::new(directory),
            Arc::new(LogAuditSink::new()),
        ))
    }

    pub fn with_services(
        settings: Settings,
        stop_flag: stop_flag::StopFlag,
        roles: Arc<RoleCatalogService>,
        directory: Arc<dyn Directory>,
        audit: Arc<dyn AuditSink>,
    ) -> SharedAppState {
        Arc::new(AppState {
            settings,
            stop_flag,
            roles,
            directory,
            audit,
        })
    }

    pub async fn new_for_config_only() -> anyhow::Result<SharedAppState> {
        let settings = Settings::new()?;

        Ok(Self::with_services(
            settings,
            stop_flag::StopFlag::new(),
            Arc::new(RoleCatalogService::in_memory(RoleCatalog::builtin())),
            Arc::new(InMemoryDirectory::new()),
            Arc::new(MemoryAuditSink::new()),
        ))
    }
}

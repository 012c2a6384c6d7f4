//! Shared test utilities for API tests

use crate::app_state::{AppState, SharedAppState};
use crate::services::{InMemoryDirectory, MemoryAuditSink, RoleCatalogService};
use crate::settings::config::Settings;
use crate::stop_flag::StopFlag;
use axum::http::HeaderValue;
use clubhouse_core::authorization::RoleCatalog;
use std::sync::Arc;

pub const TEST_CONFIG: &str = "tests/test_bearer_auth.yaml";

/// AppState from the bearer test config, seeded directory, in-memory catalog
pub async fn create_test_app_state() -> SharedAppState {
    create_test_app_state_with_audit().await.0
}

/// Like [`create_test_app_state`], also returning the audit sink for inspection
pub async fn create_test_app_state_with_audit() -> (SharedAppState, Arc<MemoryAuditSink>) {
    let settings = Settings::from_file(TEST_CONFIG).unwrap();
    create_app_state_parts(settings).await
}

pub async fn create_app_state_with_settings(settings: Settings) -> SharedAppState {
    create_app_state_parts(settings).await.0
}

async fn create_app_state_parts(settings: Settings) -> (SharedAppState, Arc<MemoryAuditSink>) {
    let directory = match &settings.directory.seed_file {
        Some(seed_file) => InMemoryDirectory::load(seed_file).await.unwrap(),
        None => InMemoryDirectory::new(),
    };
    let audit = Arc::new(MemoryAuditSink::new());

    let state = AppState::with_services(
        settings,
        StopFlag::new(),
        Arc::new(RoleCatalogService::in_memory(RoleCatalog::builtin())),
        Arc::new(directory),
        audit.clone(),
    );
    (state, audit)
}

pub fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

//! Role catalog service
//!
//! Holds the live [`RoleCatalog`](clubhouse_core::authorization::RoleCatalog)
//! behind a copy-on-write pointer and persists administrative changes to YAML.

pub mod config;
pub mod service;


pub use service::RoleCatalogService;

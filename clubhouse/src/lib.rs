//! clubhouse server library
//!
//! Router, services and application state are exposed for integration testing;
//! the binary only wires them together.

pub mod api;
pub mod app_state;
pub mod http;
pub mod init_telemetry;
pub mod services;
pub mod settings;
pub mod stop_flag;

pub use app_state::AppState;

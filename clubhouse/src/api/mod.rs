pub mod auth_core;
pub mod authentication;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;

#[cfg(test)]
pub mod test_utils;

#[cfg(test)]
mod gate_tests;

//! Shared, I/O-free building blocks of clubhouse: the role model, identity
//! context, access decision functions and the request gate.

pub mod authorization;
pub mod settings;
pub mod utils;

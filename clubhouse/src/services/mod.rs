pub mod audit;
pub mod authorization;
pub mod directory;

pub use audit::{AuditSink, LogAuditSink, MemoryAuditSink};
pub use authorization::RoleCatalogService;
pub use directory::{Directory, InMemoryDirectory};

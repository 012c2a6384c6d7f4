//! Role-scoped access control for clubhouse
//!
//! Leaf-first: the role model (`role`, `matrix`, `catalog`), the per-request
//! identity (`identity`), the pure decision functions (`policy`) and the coarse
//! request gate (`gate`). `audit` turns decisions into records for an audit sink.

pub mod audit;
pub mod catalog;
pub mod decision;
pub mod gate;
pub mod identity;
pub mod matrix;
pub mod policy;
pub mod role;

pub use audit::{AuditOutcome, DecisionRecord};
pub use catalog::{CatalogError, RoleCatalog, RoleDefinition};
pub use decision::{Decision, Denial, DenialReason, StatusClass};
pub use gate::{GateOutcome, GateState, OperationPolicy, RequestGate};
pub use identity::{Claim, ClubId, IdentityContext, Principal, UserId};
pub use matrix::PermissionMatrix;
pub use role::{is_known_role, Role, RoleParseError};

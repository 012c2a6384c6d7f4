use chrono::{DateTime, Utc};
use serde::Serialize;

use super::decision::{Decision, DenialReason};
use super::gate::{GateOutcome, GateState};
use super::identity::{IdentityContext, UserId};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuditOutcome {
    Accepted,
    Denied,
}

/// One access decision, emitted for compliance logging.
///
/// Persisting it is up to the configured audit sink.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DecisionRecord {
    pub occurred_at: DateTime<Utc>,
    pub operation: String,
    pub user_id: Option<UserId>,
    pub outcome: AuditOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<DenialReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate_state: Option<GateState>,
}

impl DecisionRecord {
    pub fn from_gate(operation: &str, outcome: &GateOutcome) -> Self {
        Self {
            occurred_at: Utc::now(),
            operation: operation.to_string(),
            user_id: outcome.identity.as_ref().and_then(|ctx| ctx.user_id()),
            outcome: audit_outcome(&outcome.decision),
            reason: outcome.decision.reason(),
            gate_state: Some(outcome.state),
        }
    }

    pub fn from_decision(operation: &str, ctx: &IdentityContext, decision: &Decision) -> Self {
        Self {
            occurred_at: Utc::now(),
            operation: operation.to_string(),
            user_id: ctx.user_id(),
            outcome: audit_outcome(decision),
            reason: decision.reason(),
            gate_state: None,
        }
    }
}

fn audit_outcome(decision: &Decision) -> AuditOutcome {
    if decision.is_allowed() {
        AuditOutcome::Accepted
    } else {
        AuditOutcome::Denied
    }
}

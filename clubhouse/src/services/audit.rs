use async_trait::async_trait;
use clubhouse_core::authorization::{AuditOutcome, DecisionRecord};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Destination for access decision records
#[async_trait]
pub trait AuditSink: Send + Sync + std::fmt::Debug {
    async fn record(&self, record: &DecisionRecord) -> anyhow::Result<()>;
}

/// Writes every decision as a structured log line under the `audit` target
#[derive(Debug)]
pub struct LogAuditSink;

impl Default for LogAuditSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogAuditSink {
    pub fn new() -> Self {
        LogAuditSink {}
    }
}

#[async_trait]
impl AuditSink for LogAuditSink {
    async fn record(&self, record: &DecisionRecord) -> anyhow::Result<()> {
        let reason = record.reason.map(|reason| reason.as_str());
        match record.outcome {
            AuditOutcome::Accepted => info!(
                target: "audit",
                operation = %record.operation,
                user_id = ?record.user_id,
                "access accepted"
            ),
            AuditOutcome::Denied => warn!(
                target: "audit",
                operation = %record.operation,
                user_id = ?record.user_id,
                reason = ?reason,
                gate_state = ?record.gate_state,
                "access denied"
            ),
        }
        Ok(())
    }
}

/// Keeps records in memory; used by tests and the `config` command
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<DecisionRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records(&self) -> Vec<DecisionRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, record: &DecisionRecord) -> anyhow::Result<()> {
        self.records.lock().await.push(record.clone());
        Ok(())
    }
}

use async_trait::async_trait;
use uuid::Uuid;

use crate::entry::{EventKind, EventRecord};
use vigil_types::{AgentId, VigilError};

/// Append-only event log. All log implementations must satisfy this.
///
/// External indexers and UIs consume the log; the state machine only ever
/// appends to it, exactly once per committed transition.
#[async_trait]
pub trait EventLog: Send + Sync {
    /// Append a record to the log.
    async fn append(&self, record: EventRecord) -> Result<(), VigilError>;

    /// Get a record by its ID.
    async fn get(&self, id: Uuid) -> Result<Option<EventRecord>, VigilError>;

    /// Get the latest record hash (for chaining).
    async fn latest_hash(&self) -> Result<Option<String>, VigilError>;

    /// Query records by subject.
    async fn query_by_subject(&self, subject: AgentId)
    -> Result<Vec<EventRecord>, VigilError>;

    /// Query records by kind.
    async fn query_by_kind(&self, kind: EventKind) -> Result<Vec<EventRecord>, VigilError>;

    /// Get all records (for auditing).
    async fn all_records(&self) -> Result<Vec<EventRecord>, VigilError>;

    /// Verify the chain integrity.
    async fn verify_integrity(&self) -> Result<bool, VigilError>;
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use vigil_types::AgentId;

/// Types of event records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EventKind {
    Pulse,
    AttestationSubmitted,
    FeeSplit,
    HazardUpdated,
    TtlUpdated,
    MinPulseAmountUpdated,
    Paused,
    Unpaused,
}

/// An immutable record of one committed state transition.
///
/// The hash covers only the chain-derived fields (`chain_time`, kind, actor,
/// subject, payload, previous hash), so replaying the same transitions
/// reproduces the same chain. `recorded_at` is local observability metadata
/// and stays outside the preimage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: Uuid,
    pub kind: EventKind,
    /// Chain time of the transition, seconds.
    pub chain_time: u64,
    /// Wall-clock instant this node recorded the event.
    pub recorded_at: DateTime<Utc>,
    pub actor: AgentId,
    pub subject: AgentId,
    pub payload: serde_json::Value,
    pub previous_hash: Option<String>,
    pub hash: String,
}

impl EventRecord {
    pub fn new(
        kind: EventKind,
        chain_time: u64,
        actor: AgentId,
        subject: AgentId,
        payload: serde_json::Value,
        previous_hash: Option<String>,
    ) -> Self {
        let preimage = format!(
            "{}:{:?}:{}:{}:{}:{}",
            chain_time,
            kind,
            actor,
            subject,
            payload,
            previous_hash.as_deref().unwrap_or("genesis"),
        );

        let mut hasher = Sha256::new();
        hasher.update(preimage.as_bytes());
        let hash = format!("{:x}", hasher.finalize());

        Self {
            id: Uuid::new_v4(),
            kind,
            chain_time,
            recorded_at: Utc::now(),
            actor,
            subject,
            payload,
            previous_hash,
            hash,
        }
    }
}

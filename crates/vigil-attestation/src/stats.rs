use serde::{Deserialize, Serialize};

use vigil_types::AgentId;

/// Aggregate endorsement weights for one subject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationStats {
    pub positive_weight: u128,
    pub negative_weight: u128,
}

impl AttestationStats {
    /// `positive - negative`. Weights are at most 100 per attestation, so
    /// the accumulators stay far below the signed range.
    pub fn net_score(&self) -> i128 {
        self.positive_weight as i128 - self.negative_weight as i128
    }
}

/// Receipt returned by a successful attestation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationReceipt {
    pub attestor: AgentId,
    pub subject: AgentId,
    pub positive: bool,
    /// The attestor's reliability score at call time.
    pub weight: u8,
    pub epoch: u64,
}

/// Per-attestor submission counter for one epoch. Stale counters are
/// reinterpreted as zero once the epoch advances; nothing tears them down.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EpochCounter {
    pub epoch: u64,
    pub submitted: u32,
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use vigil_types::{AgentId, Amount, Result};

/// Transferable-balance token consumed by the core.
///
/// This is a fallible boundary: implementations may run arbitrary
/// third-party logic, so callers must treat every method as able to fail
/// and must not commit internal state that a failure would orphan.
#[async_trait]
pub trait TokenTransfer: Send + Sync {
    /// Move `amount` from `from` to `to`.
    async fn transfer_from(&self, from: AgentId, to: AgentId, amount: Amount) -> Result<()>;

    /// Current balance of an account.
    async fn balance_of(&self, id: AgentId) -> Amount;
}

/// Outcome of splitting one heartbeat payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitReceipt {
    pub burned: Amount,
    pub fee: Amount,
}

impl SplitReceipt {
    pub fn total(&self) -> Amount {
        self.burned + self.fee
    }
}

/// The narrow capability the liveness registry consumes: take a heartbeat
/// payment from an agent and route it. `FeeSplitBurner` is the production
/// implementation; tests substitute fakes.
#[async_trait]
pub trait HeartbeatCollector: Send + Sync {
    async fn collect(&self, from: AgentId, amount: Amount) -> Result<SplitReceipt>;
}

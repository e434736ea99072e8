use async_trait::async_trait;
use dashmap::DashMap;

use crate::traits::TokenTransfer;
use vigil_types::{AgentId, Amount, Result, VigilError};

/// In-memory balance book for tests and demos.
#[derive(Debug, Default)]
pub struct InMemoryToken {
    balances: DashMap<AgentId, Amount>,
}

impl InMemoryToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an account out of thin air.
    pub fn mint(&self, to: AgentId, amount: Amount) {
        *self.balances.entry(to).or_insert(0) += amount;
    }
}

#[async_trait]
impl TokenTransfer for InMemoryToken {
    async fn transfer_from(&self, from: AgentId, to: AgentId, amount: Amount) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        {
            let mut source = self
                .balances
                .get_mut(&from)
                .ok_or_else(|| VigilError::TokenTransfer(format!("unknown account {from}")))?;
            if *source < amount {
                return Err(VigilError::TokenTransfer(format!(
                    "balance {} of {from} below transfer amount {amount}",
                    *source
                )));
            }
            *source -= amount;
        }
        *self.balances.entry(to).or_insert(0) += amount;
        Ok(())
    }

    async fn balance_of(&self, id: AgentId) -> Amount {
        self.balances.get(&id).map(|b| *b).unwrap_or(0)
    }
}

use serde::{Deserialize, Serialize};

use vigil_types::{AgentId, Amount, Result, VigilConfig, VigilError};

/// Owner-gated global parameters of the registry.
///
/// An explicit value injected at construction, never an ambient singleton.
/// Only the owner mutates it, and every mutation takes effect on the very
/// next read: lowering the TTL can kill a currently-alive agent, raising it
/// can resurrect an expired one. That retroactivity is a deliberate
/// governance trade-off, not an accident; see DESIGN.md.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Governance {
    pub owner: AgentId,
    pub ttl_seconds: u64,
    pub min_pulse_amount: Amount,
    pub paused: bool,
}

impl Governance {
    pub fn new(owner: AgentId, ttl_seconds: u64, min_pulse_amount: Amount) -> Result<Self> {
        if owner.is_zero() {
            return Err(VigilError::ZeroAddress);
        }
        Ok(Self {
            owner,
            ttl_seconds,
            min_pulse_amount,
            paused: false,
        })
    }

    pub fn from_config(owner: AgentId, config: &VigilConfig) -> Result<Self> {
        Self::new(owner, config.ttl_seconds, config.min_pulse_amount as Amount)
    }

    /// Authorize an admin call.
    pub fn require_owner(&self, caller: AgentId) -> Result<()> {
        if caller != self.owner {
            return Err(VigilError::NotOwner(caller));
        }
        Ok(())
    }
}

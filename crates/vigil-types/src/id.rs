use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token amount in the smallest representable unit.
pub type Amount = u128;

/// Identity of an on-chain participant (agent, treasury, burn sink).
///
/// The nil identity plays the role of the null address: it is never a valid
/// participant, and constructors that require a real identity reject it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AgentId(Uuid);

impl AgentId {
    /// The null identity.
    pub const ZERO: AgentId = AgentId(Uuid::nil());

    /// Generate a fresh random identity.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_nil()
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for AgentId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

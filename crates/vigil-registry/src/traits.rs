use vigil_types::AgentId;

/// Read-only liveness capability consumed by the attestation engine.
///
/// Deliberately narrow so the engine can be exercised against a fake
/// implementation instead of a full registry. Both methods are synchronous
/// views over the latest committed state.
pub trait LivenessView: Send + Sync {
    /// Whether the agent pulsed within the TTL window (inclusive boundary).
    fn is_alive(&self, id: AgentId) -> bool;

    /// Current reliability score in [0, 100]. Always 0 for a dead or
    /// unknown agent.
    fn reliability_score(&self, id: AgentId) -> u8;
}

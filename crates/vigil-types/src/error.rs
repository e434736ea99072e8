use thiserror::Error;

use crate::id::{AgentId, Amount};

/// Errors surfaced by the liveness and attestation state machine.
///
/// Two families: validation errors are caller-correctable and always carry
/// the offending value alongside the limit; policy rejections are deliberate
/// anti-abuse refusals and always identify the rejected party. Every failed
/// operation reverts completely; no intermediate state is observable.
#[derive(Debug, Error)]
pub enum VigilError {
    // --- validation ---
    #[error("pulse amount {provided} below minimum {min}")]
    BelowMinimumPulse { provided: Amount, min: Amount },

    #[error("hazard score {provided} exceeds maximum {max}")]
    InvalidHazardScore { provided: u8, max: u8 },

    #[error("fee split {provided} bps exceeds maximum {max}")]
    InvalidFeeBps { provided: u16, max: u16 },

    #[error("the null identity is not a valid participant")]
    ZeroAddress,

    // --- policy rejection ---
    #[error("registry is paused")]
    RegistryPaused,

    #[error("caller {0} is not the governance owner")]
    NotOwner(AgentId),

    #[error("an agent cannot attest itself")]
    SelfAttestationNotAllowed,

    #[error("attestor {0} is not alive")]
    AttestorNotAlive(AgentId),

    #[error("subject {0} is not a live registered agent")]
    SubjectNotRegistered(AgentId),

    #[error("attestation for this subject already submitted this epoch")]
    AttestationAlreadySubmittedThisEpoch,

    #[error("attestation cap reached: {submitted} of {max} this epoch")]
    MaxAttestationsReached { submitted: u32, max: u32 },

    // --- boundary ---
    #[error("token transfer failed: {0}")]
    TokenTransfer(String),

    #[error("event log error: {0}")]
    EventLog(String),
}

pub type Result<T> = std::result::Result<T, VigilError>;

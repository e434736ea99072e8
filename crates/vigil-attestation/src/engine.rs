use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use vigil_ledger::{EventKind, EventLog, EventRecord};
use vigil_registry::LivenessView;
use vigil_registry::bucket::{day_bucket, seconds_until_rollover};
use vigil_types::{AgentId, ChainClock, Result, VigilError};

use crate::stats::{AttestationReceipt, AttestationStats, EpochCounter};

/// Most attestations one attestor may submit per epoch.
pub const MAX_ATTESTATIONS_PER_EPOCH: u32 = 10;

/// Sybil-resistant peer endorsement engine.
///
/// Any live agent may endorse or flag a live peer once per epoch, up to a
/// per-epoch throughput cap. Each endorsement is weighted by the endorser's
/// reliability score read from the liveness registry at call time, never a
/// value cached at registration, so a farm of fresh low-reliability
/// identities contributes near-zero aggregate weight.
pub struct PeerAttestationEngine {
    liveness: Arc<dyn LivenessView>,
    log: Arc<dyn EventLog>,
    clock: Arc<dyn ChainClock>,
    aggregates: DashMap<AgentId, AttestationStats>,
    /// Last epoch each `(attestor, subject)` pair attested in.
    pair_epochs: DashMap<(AgentId, AgentId), u64>,
    counters: DashMap<AgentId, EpochCounter>,
    total_attestations: AtomicU64,
}

impl PeerAttestationEngine {
    pub fn new(
        liveness: Arc<dyn LivenessView>,
        log: Arc<dyn EventLog>,
        clock: Arc<dyn ChainClock>,
    ) -> Self {
        Self {
            liveness,
            log,
            clock,
            aggregates: DashMap::new(),
            pair_epochs: DashMap::new(),
            counters: DashMap::new(),
            total_attestations: AtomicU64::new(0),
        }
    }

    /// Endorse (`positive`) or flag a live peer.
    pub async fn attest(
        &self,
        attestor: AgentId,
        subject: AgentId,
        positive: bool,
    ) -> Result<AttestationReceipt> {
        let now = self.clock.now();
        let epoch = day_bucket(now);
        self.check_guards(attestor, subject, epoch)?;

        // Weight is the attestor's standing right now.
        let weight = self.liveness.reliability_score(attestor);

        {
            let mut stats = self.aggregates.entry(subject).or_default();
            if positive {
                stats.positive_weight += weight as u128;
            } else {
                stats.negative_weight += weight as u128;
            }
        }
        self.pair_epochs.insert((attestor, subject), epoch);
        self.counters
            .entry(attestor)
            .and_modify(|counter| {
                if counter.epoch == epoch {
                    counter.submitted += 1;
                } else {
                    *counter = EpochCounter {
                        epoch,
                        submitted: 1,
                    };
                }
            })
            .or_insert(EpochCounter {
                epoch,
                submitted: 1,
            });
        self.total_attestations.fetch_add(1, Ordering::SeqCst);

        tracing::info!(%attestor, %subject, positive, weight, "attestation submitted");

        let previous_hash = self.log.latest_hash().await?;
        self.log
            .append(EventRecord::new(
                EventKind::AttestationSubmitted,
                now,
                attestor,
                subject,
                serde_json::json!({
                    "positive": positive,
                    "weight": weight,
                    "epoch": epoch,
                }),
                previous_hash,
            ))
            .await?;

        Ok(AttestationReceipt {
            attestor,
            subject,
            positive,
            weight,
            epoch,
        })
    }

    /// Pure mirror of the `attest` guard chain, for pre-flight checks.
    /// Mutates nothing; the error names the reason an attestation would be
    /// rejected right now.
    pub fn can_attest(&self, attestor: AgentId, subject: AgentId) -> Result<()> {
        let epoch = day_bucket(self.clock.now());
        self.check_guards(attestor, subject, epoch)
    }

    /// Aggregate weights recorded for a subject.
    pub fn attestation_stats(&self, subject: AgentId) -> AttestationStats {
        self.aggregates
            .get(&subject)
            .map(|stats| *stats)
            .unwrap_or_default()
    }

    /// Attestations the attestor may still submit this epoch. Returns the
    /// full cap once the epoch has advanced past the recorded counter.
    pub fn remaining_attestations(&self, attestor: AgentId) -> u32 {
        let epoch = day_bucket(self.clock.now());
        MAX_ATTESTATIONS_PER_EPOCH - self.submitted_this_epoch(attestor, epoch)
    }

    /// Seconds until the attestor's epoch counter window rolls over, or 0
    /// if it already has (or the attestor never attested).
    pub fn time_until_epoch_reset(&self, attestor: AgentId) -> u64 {
        let now = self.clock.now();
        match self.counters.get(&attestor) {
            Some(counter) if counter.epoch == day_bucket(now) => {
                seconds_until_rollover(now, counter.epoch)
            }
            _ => 0,
        }
    }

    /// Attestations recorded across all attestors and epochs.
    pub fn total_attestations(&self) -> u64 {
        self.total_attestations.load(Ordering::SeqCst)
    }

    fn submitted_this_epoch(&self, attestor: AgentId, epoch: u64) -> u32 {
        match self.counters.get(&attestor) {
            Some(counter) if counter.epoch == epoch => counter.submitted,
            _ => 0,
        }
    }

    fn check_guards(&self, attestor: AgentId, subject: AgentId, epoch: u64) -> Result<()> {
        if attestor == subject {
            return Err(VigilError::SelfAttestationNotAllowed);
        }
        if !self.liveness.is_alive(attestor) {
            return Err(VigilError::AttestorNotAlive(attestor));
        }
        if !self.liveness.is_alive(subject) {
            return Err(VigilError::SubjectNotRegistered(subject));
        }
        if self.pair_epochs.get(&(attestor, subject)).map(|e| *e) == Some(epoch) {
            return Err(VigilError::AttestationAlreadySubmittedThisEpoch);
        }
        let submitted = self.submitted_this_epoch(attestor, epoch);
        if submitted >= MAX_ATTESTATIONS_PER_EPOCH {
            return Err(VigilError::MaxAttestationsReached {
                submitted,
                max: MAX_ATTESTATIONS_PER_EPOCH,
            });
        }
        Ok(())
    }
}

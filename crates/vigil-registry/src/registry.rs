use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;

use vigil_ledger::{EventKind, EventLog, EventRecord};
use vigil_token::HeartbeatCollector;
use vigil_types::{AgentId, Amount, ChainClock, Result, VigilError};

use crate::bucket;
use crate::governance::Governance;
use crate::record::{AgentStatus, PulseRecord};
use crate::traits::LivenessView;

/// Upper bound of the admin-assigned hazard score.
pub const MAX_HAZARD_SCORE: u8 = 100;

/// Owns every agent's heartbeat record and the liveness rules over them.
///
/// All mutating operations are applied as single serialized transitions by
/// the embedding ledger; each one either fully commits or fully reverts.
/// Payments route through the injected [`HeartbeatCollector`] before any
/// internal state is touched, so a failed transfer leaves no trace here.
pub struct LivenessRegistry {
    records: DashMap<AgentId, PulseRecord>,
    governance: RwLock<Governance>,
    collector: Arc<dyn HeartbeatCollector>,
    log: Arc<dyn EventLog>,
    clock: Arc<dyn ChainClock>,
}

impl LivenessRegistry {
    pub fn new(
        governance: Governance,
        collector: Arc<dyn HeartbeatCollector>,
        log: Arc<dyn EventLog>,
        clock: Arc<dyn ChainClock>,
    ) -> Self {
        Self {
            records: DashMap::new(),
            governance: RwLock::new(governance),
            collector,
            log,
            clock,
        }
    }

    /// Snapshot of the current governance parameters.
    pub fn governance(&self) -> Governance {
        self.governance.read().clone()
    }

    /// Record a heartbeat payment for `agent`.
    ///
    /// The amount moves through the collector (burn + fee) first; the streak
    /// transition commits only after the transfer succeeds. Same-bucket
    /// pulses still move tokens but leave the streak counter unchanged, in
    /// whichever order they land.
    pub async fn pulse(&self, agent: AgentId, amount: Amount) -> Result<AgentStatus> {
        if agent.is_zero() {
            return Err(VigilError::ZeroAddress);
        }
        let min = {
            let governance = self.governance.read();
            if governance.paused {
                return Err(VigilError::RegistryPaused);
            }
            governance.min_pulse_amount
        };
        if amount < min {
            return Err(VigilError::BelowMinimumPulse {
                provided: amount,
                min,
            });
        }

        let now = self.clock.now();
        let receipt = self.collector.collect(agent, amount).await?;

        let status = {
            let mut record = self
                .records
                .entry(agent)
                .or_insert_with(PulseRecord::dormant);
            let update = bucket::advance_streak(now, record.marker());
            record.streak = update.streak;
            record.last_streak_day = update.day;
            // Monotonic clock makes `max` a no-op; it re-asserts the
            // non-decreasing invariant regardless.
            let at = record.last_pulse_at.map_or(now, |prev| prev.max(now));
            record.last_pulse_at = Some(at);
            AgentStatus {
                alive: true,
                last_pulse_at: at,
                streak: record.streak,
                hazard_score: record.hazard_score,
            }
        };

        tracing::info!(%agent, amount = %amount, streak = status.streak, "pulse recorded");

        self.append_event(
            EventKind::Pulse,
            now,
            agent,
            agent,
            serde_json::json!({
                "amount": amount.to_string(),
                "burned": receipt.burned.to_string(),
                "fee": receipt.fee.to_string(),
                "streak": status.streak,
            }),
        )
        .await?;

        Ok(status)
    }

    /// Whether `agent` pulsed within the TTL window. The boundary is
    /// inclusive: elapsed exactly `ttl_seconds` is still alive. An agent
    /// that has never pulsed is never alive.
    pub fn is_alive(&self, agent: AgentId) -> bool {
        let ttl = self.governance.read().ttl_seconds;
        match self.records.get(&agent) {
            Some(record) => Self::alive_at(&record, self.clock.now(), ttl),
            None => false,
        }
    }

    /// One consistent snapshot of an agent's liveness state.
    pub fn agent_status(&self, agent: AgentId) -> AgentStatus {
        let ttl = self.governance.read().ttl_seconds;
        let now = self.clock.now();
        match self.records.get(&agent) {
            Some(record) => AgentStatus {
                alive: Self::alive_at(&record, now, ttl),
                last_pulse_at: record.last_pulse_at.unwrap_or(0),
                streak: record.streak,
                hazard_score: record.hazard_score,
            },
            None => AgentStatus::unknown(),
        }
    }

    /// Reliability of an agent in [0, 100]: the capped streak discounted by
    /// the hazard score. Dead and unknown agents score 0, so endorsement
    /// influence always tracks current standing.
    pub fn reliability_score_of(&self, agent: AgentId) -> u8 {
        let ttl = self.governance.read().ttl_seconds;
        match self.records.get(&agent) {
            Some(record) if Self::alive_at(&record, self.clock.now(), ttl) => {
                // Streak contributes one point per consecutive day, capped
                // at 100, then discounted by the hazard score.
                let base = record.streak.min(100);
                (base * (MAX_HAZARD_SCORE - record.hazard_score) as u32 / 100) as u8
            }
            _ => 0,
        }
    }

    /// Owner-only: assign an agent's hazard score (0–100). Creates a
    /// dormant record for an agent that has never pulsed; the score alone
    /// never makes an agent alive.
    pub async fn update_hazard(&self, caller: AgentId, agent: AgentId, score: u8) -> Result<()> {
        self.governance.read().require_owner(caller)?;
        if score > MAX_HAZARD_SCORE {
            return Err(VigilError::InvalidHazardScore {
                provided: score,
                max: MAX_HAZARD_SCORE,
            });
        }
        self.records
            .entry(agent)
            .or_insert_with(PulseRecord::dormant)
            .hazard_score = score;

        tracing::info!(%agent, score, "hazard score updated");

        self.append_event(
            EventKind::HazardUpdated,
            self.clock.now(),
            caller,
            agent,
            serde_json::json!({ "score": score }),
        )
        .await
    }

    /// Owner-only: change the liveness TTL. Takes effect on the very next
    /// read for every agent: shrinking it can kill currently-alive agents,
    /// growing it can resurrect expired ones.
    pub async fn set_ttl(&self, caller: AgentId, ttl_seconds: u64) -> Result<()> {
        {
            let mut governance = self.governance.write();
            governance.require_owner(caller)?;
            governance.ttl_seconds = ttl_seconds;
        }
        tracing::info!(ttl_seconds, "liveness TTL updated");
        self.append_event(
            EventKind::TtlUpdated,
            self.clock.now(),
            caller,
            caller,
            serde_json::json!({ "ttl_seconds": ttl_seconds }),
        )
        .await
    }

    /// Owner-only: change the minimum pulse amount.
    pub async fn set_min_pulse_amount(&self, caller: AgentId, amount: Amount) -> Result<()> {
        {
            let mut governance = self.governance.write();
            governance.require_owner(caller)?;
            governance.min_pulse_amount = amount;
        }
        tracing::info!(amount = %amount, "minimum pulse amount updated");
        self.append_event(
            EventKind::MinPulseAmountUpdated,
            self.clock.now(),
            caller,
            caller,
            serde_json::json!({ "amount": amount.to_string() }),
        )
        .await
    }

    /// Owner-only: stop accepting pulses.
    pub async fn pause(&self, caller: AgentId) -> Result<()> {
        {
            let mut governance = self.governance.write();
            governance.require_owner(caller)?;
            governance.paused = true;
        }
        tracing::warn!("registry paused");
        self.append_event(
            EventKind::Paused,
            self.clock.now(),
            caller,
            caller,
            serde_json::json!({}),
        )
        .await
    }

    /// Owner-only: resume accepting pulses.
    pub async fn unpause(&self, caller: AgentId) -> Result<()> {
        {
            let mut governance = self.governance.write();
            governance.require_owner(caller)?;
            governance.paused = false;
        }
        tracing::info!("registry unpaused");
        self.append_event(
            EventKind::Unpaused,
            self.clock.now(),
            caller,
            caller,
            serde_json::json!({}),
        )
        .await
    }

    fn alive_at(record: &PulseRecord, now: u64, ttl: u64) -> bool {
        match record.last_pulse_at {
            Some(at) => now.saturating_sub(at) <= ttl,
            None => false,
        }
    }

    async fn append_event(
        &self,
        kind: EventKind,
        chain_time: u64,
        actor: AgentId,
        subject: AgentId,
        payload: serde_json::Value,
    ) -> Result<()> {
        let previous_hash = self.log.latest_hash().await?;
        self.log
            .append(EventRecord::new(
                kind,
                chain_time,
                actor,
                subject,
                payload,
                previous_hash,
            ))
            .await
    }
}

impl LivenessView for LivenessRegistry {
    fn is_alive(&self, id: AgentId) -> bool {
        LivenessRegistry::is_alive(self, id)
    }

    fn reliability_score(&self, id: AgentId) -> u8 {
        self.reliability_score_of(id)
    }
}

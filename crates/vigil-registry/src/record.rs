use serde::{Deserialize, Serialize};

/// Per-agent heartbeat record.
///
/// Created implicitly the first time an agent pulses (or the owner assigns
/// it a hazard score) and never deleted: a dead agent's record persists and
/// the agent comes back alive with a later pulse. `last_pulse_at` is `None`
/// until the first pulse and non-decreasing afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PulseRecord {
    pub last_pulse_at: Option<u64>,
    pub streak: u32,
    pub last_streak_day: u64,
    pub hazard_score: u8,
}

impl PulseRecord {
    /// A record that exists (e.g. hazard was assigned) but has never pulsed.
    pub fn dormant() -> Self {
        Self {
            last_pulse_at: None,
            streak: 0,
            last_streak_day: 0,
            hazard_score: 0,
        }
    }

    /// The `(day, streak)` marker fed to the bucket arithmetic, or `None`
    /// before the first pulse.
    pub fn marker(&self) -> Option<(u64, u32)> {
        self.last_pulse_at
            .map(|_| (self.last_streak_day, self.streak))
    }
}

/// One consistent snapshot of an agent, as exposed to readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStatus {
    pub alive: bool,
    /// 0 if the agent has never pulsed.
    pub last_pulse_at: u64,
    pub streak: u32,
    pub hazard_score: u8,
}

impl AgentStatus {
    pub fn unknown() -> Self {
        Self {
            alive: false,
            last_pulse_at: 0,
            streak: 0,
            hazard_score: 0,
        }
    }
}

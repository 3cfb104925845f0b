//! Session state and core simulation types
//!
//! The [`Session`] is the only holder of score, status and difficulty. Its
//! methods are the sole mutators; calls made in the wrong state do nothing.

use serde::{Deserialize, Serialize};

use super::ObjectId;
use super::scheduler::{Scheduler, Task, TaskHandle};
use crate::tuning::Tuning;

/// Lifecycle of one play-through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionStatus {
    /// No session running (start screen)
    #[default]
    Idle,
    /// Viruses are falling
    Active,
    /// A virus breached the floor
    Over,
}

/// Status line shown in the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusLabel {
    Active,
    Breach,
}

impl StatusLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLabel::Active => "ACTIVE",
            StatusLabel::Breach => "BREACH",
        }
    }
}

/// Plain values the shell renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub destroyed: u32,
    /// None while idle
    pub status: Option<StatusLabel>,
    /// Set once a breach ends the session
    pub final_score: Option<u64>,
    pub tier: u8,
    pub overlay_open: bool,
}

/// Notable things that happened during a simulation step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Spawned { id: ObjectId, x: f32 },
    Destroyed { id: ObjectId, score: u64 },
    TierChanged { tier: u8 },
    Breach { id: ObjectId, final_score: u64 },
    Reset,
}

/// One play-through from start to breach or reset
#[derive(Debug, Clone)]
pub struct Session {
    status: SessionStatus,
    score: u64,
    destroyed: u32,
    tier: u8,
    elapsed_ms: u64,
    final_score: Option<u64>,
    /// Score per destroyed virus
    reward: u64,
    /// Bumped on every start so escalations from an older session are ignored
    generation: u32,
    /// Pending tier escalations, in due order
    escalations: Vec<TaskHandle>,
}

impl Session {
    pub fn new(reward: u64) -> Self {
        Self {
            status: SessionStatus::Idle,
            score: 0,
            destroyed: 0,
            tier: 1,
            elapsed_ms: 0,
            final_score: None,
            reward,
            generation: 0,
            escalations: Vec::new(),
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn destroyed(&self) -> u32 {
        self.destroyed
    }

    pub fn tier(&self) -> u8 {
        self.tier
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Escalation tasks still waiting to fire
    pub fn pending_escalations(&self) -> usize {
        self.escalations.len()
    }

    /// Begin a new session from Idle or Over. Schedules one escalation per
    /// tier after the first, relative to the scheduler's current time.
    pub fn start(&mut self, scheduler: &mut Scheduler, tuning: &Tuning) -> bool {
        if self.status == SessionStatus::Active {
            return false;
        }
        self.cancel_escalations(scheduler);

        self.status = SessionStatus::Active;
        self.score = 0;
        self.destroyed = 0;
        self.tier = 1;
        self.elapsed_ms = 0;
        self.final_score = None;
        self.generation = self.generation.wrapping_add(1);

        for (index, entry) in tuning.tiers.iter().enumerate().skip(1) {
            let Ok(tier) = u8::try_from(index + 1) else {
                break;
            };
            let task = Task::Escalate {
                tier,
                session: self.generation,
            };
            self.escalations
                .push(scheduler.schedule(entry.threshold_ms, task));
        }
        true
    }

    /// Award the destroy reward. Active only.
    pub fn report_destroyed(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.score = self.score.saturating_add(self.reward);
        self.destroyed = self.destroyed.saturating_add(1);
        true
    }

    /// End the session as a loss, freezing the score. Active only.
    pub fn report_breach(&mut self, scheduler: &mut Scheduler) -> bool {
        if !self.is_active() {
            return false;
        }
        self.status = SessionStatus::Over;
        self.final_score = Some(self.score);
        self.cancel_escalations(scheduler);
        true
    }

    /// Back to Idle from any state
    pub fn reset(&mut self, scheduler: &mut Scheduler) {
        self.cancel_escalations(scheduler);
        self.status = SessionStatus::Idle;
        self.score = 0;
        self.destroyed = 0;
        self.tier = 1;
        self.elapsed_ms = 0;
        self.final_score = None;
    }

    /// Apply a fired escalation. Ignored unless it belongs to this session,
    /// the session is still Active and the tier is actually higher.
    pub fn escalate(&mut self, tier: u8, session: u32, now: u64) -> bool {
        self.escalations.retain(|handle| handle.due() > now);
        if !self.is_active() || session != self.generation || tier <= self.tier {
            return false;
        }
        self.tier = tier;
        true
    }

    /// Count session time. Only runs while Active.
    pub fn advance_clock(&mut self, dt_ms: u64) {
        if self.is_active() {
            self.elapsed_ms += dt_ms;
        }
    }

    /// Status line for the HUD
    pub fn label(&self) -> Option<StatusLabel> {
        match self.status {
            SessionStatus::Idle => None,
            SessionStatus::Active => Some(StatusLabel::Active),
            SessionStatus::Over => Some(StatusLabel::Breach),
        }
    }

    fn cancel_escalations(&mut self, scheduler: &mut Scheduler) {
        for handle in self.escalations.drain(..) {
            scheduler.cancel(handle);
        }
    }
}

//! Falling virus entity and its per-tick motion

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ObjectId;
use super::scheduler::{Scheduler, TaskHandle};

/// Result of one motion tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionOutcome {
    /// Still above the floor
    Falling,
    /// Reached the floor while alive
    Breached,
}

/// A virus falling toward the bottom of the canvas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingObject {
    pub id: ObjectId,
    /// Top-left corner in canvas pixels (y grows downward)
    pub pos: Vec2,
    /// Pixels per motion tick, fixed at spawn
    pub speed: f32,
    /// Canvas height when spawned; reaching it is a breach
    pub floor: f32,
    /// False once the player destroys it
    pub alive: bool,
    /// Pending motion tick
    #[serde(skip)]
    pub motion: Option<TaskHandle>,
    /// Pending removal after destruction
    #[serde(skip)]
    pub removal: Option<TaskHandle>,
}

impl FallingObject {
    /// New virus just above the top edge at horizontal offset `x`
    pub fn new(id: ObjectId, x: f32, size: f32, speed: f32, floor: f32) -> Self {
        Self {
            id,
            pos: Vec2::new(x, -size),
            speed,
            floor,
            alive: true,
            motion: None,
            removal: None,
        }
    }

    /// Move down by one tick
    pub fn step(&mut self) -> MotionOutcome {
        self.pos.y += self.speed;
        if self.pos.y >= self.floor {
            MotionOutcome::Breached
        } else {
            MotionOutcome::Falling
        }
    }

    /// Center of the sprite
    pub fn center(&self, size: f32) -> Vec2 {
        self.pos + Vec2::splat(size / 2.0)
    }

    /// Whether a canvas point lands on the sprite
    pub fn contains(&self, point: Vec2, size: f32) -> bool {
        let local = point - self.pos;
        local.x >= 0.0 && local.y >= 0.0 && local.x < size && local.y < size
    }

    /// Cancel any pending motion or removal task
    pub fn cancel_timers(&mut self, scheduler: &mut Scheduler) {
        if let Some(handle) = self.motion.take() {
            scheduler.cancel(handle);
        }
        if let Some(handle) = self.removal.take() {
            scheduler.cancel(handle);
        }
    }
}

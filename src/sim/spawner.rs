//! Virus spawning on a variable-rate schedule

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::ObjectId;
use super::motion::FallingObject;
use super::scheduler::{Scheduler, Task, TaskHandle};
use crate::tuning::TierSpec;

/// Places new viruses and owns the pending spawn timer
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: Pcg32,
    pending: Option<TaskHandle>,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            pending: None,
        }
    }

    /// Queue the first spawn for right now
    pub fn begin(&mut self, scheduler: &mut Scheduler) {
        self.stop(scheduler);
        self.pending = Some(scheduler.schedule(0, Task::Spawn));
    }

    /// Cancel the pending spawn, if any
    pub fn stop(&mut self, scheduler: &mut Scheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
        }
    }

    /// Called when the pending spawn task has fired
    pub fn fired(&mut self) {
        self.pending = None;
    }

    /// Queue the next spawn
    pub fn schedule_next(&mut self, scheduler: &mut Scheduler, interval_ms: u64) {
        self.stop(scheduler);
        self.pending = Some(scheduler.schedule(interval_ms, Task::Spawn));
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    /// Uniform horizontal position that keeps the sprite inside the canvas
    pub fn roll_x(&mut self, canvas_width: f32, object_size: f32) -> f32 {
        let max_x = (canvas_width - object_size).max(0.0);
        self.rng.random::<f32>() * max_x
    }

    /// Create a virus for the current tier, just above the top edge
    pub fn spawn(
        &mut self,
        id: ObjectId,
        viewport: Vec2,
        object_size: f32,
        tier: &TierSpec,
    ) -> FallingObject {
        let x = self.roll_x(viewport.x, object_size);
        FallingObject::new(id, x, object_size, tier.speed, viewport.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_positions_stay_inside_canvas() {
        let mut spawner = Spawner::new(99);
        for _ in 0..1000 {
            let x = spawner.roll_x(800.0, 40.0);
            assert!((0.0..=760.0).contains(&x), "x out of range: {x}");
        }
    }

    #[test]
    fn test_narrow_canvas_pins_to_left_edge() {
        let mut spawner = Spawner::new(1);
        assert_eq!(spawner.roll_x(30.0, 40.0), 0.0);
    }

    #[test]
    fn test_same_seed_same_positions() {
        let mut a = Spawner::new(12345);
        let mut b = Spawner::new(12345);
        for _ in 0..10 {
            assert_eq!(a.roll_x(800.0, 40.0), b.roll_x(800.0, 40.0));
        }
    }

    #[test]
    fn test_spawn_uses_tier_speed() {
        let tuning = Tuning::default();
        let mut spawner = Spawner::new(5);
        let object = spawner.spawn(7, Vec2::new(800.0, 600.0), 40.0, &tuning.tier(2));
        assert_eq!(object.id, 7);
        assert_eq!(object.speed, 3.0);
        assert_eq!(object.pos.y, -40.0);
        assert_eq!(object.floor, 600.0);
    }

    #[test]
    fn test_begin_and_stop() {
        let mut scheduler = Scheduler::new();
        let mut spawner = Spawner::new(0);
        spawner.begin(&mut scheduler);
        assert!(spawner.is_scheduled());
        // Restarting replaces the pending spawn instead of stacking another
        spawner.begin(&mut scheduler);
        assert_eq!(scheduler.len(), 1);

        spawner.stop(&mut scheduler);
        assert!(!spawner.is_scheduled());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_schedule_next_uses_interval() {
        let mut scheduler = Scheduler::new();
        let mut spawner = Spawner::new(0);
        spawner.schedule_next(&mut scheduler, 1500);
        assert_eq!(scheduler.pop_due(1499), None);
        assert_eq!(scheduler.pop_due(1500), Some((1500, Task::Spawn)));
    }
}

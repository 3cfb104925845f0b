//! Destruction burst (visual only)

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ObjectId;
use super::scheduler::{Scheduler, TaskHandle};

/// A single spark
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2, // px per tick
    pub opacity: f32,
}

/// Ring of sparks flying out from a destroyed virus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleBurst {
    pub id: ObjectId,
    pub particles: Vec<Particle>,
    #[serde(skip)]
    pub task: Option<TaskHandle>,
}

impl ParticleBurst {
    /// `count` sparks at equal angular spacing, all moving at `speed`
    pub fn new(id: ObjectId, origin: Vec2, count: usize, speed: f32) -> Self {
        let particles = (0..count)
            .map(|i| {
                let angle = std::f32::consts::TAU * i as f32 / count as f32;
                Particle {
                    pos: origin,
                    vel: Vec2::from_angle(angle) * speed,
                    opacity: 1.0,
                }
            })
            .collect();
        Self {
            id,
            particles,
            task: None,
        }
    }

    /// Advance one tick, dropping faded sparks. Returns false once empty.
    pub fn step(&mut self, fade: f32) -> bool {
        for particle in &mut self.particles {
            particle.pos += particle.vel;
            particle.opacity -= fade;
        }
        self.particles.retain(|p| p.opacity > 0.0);
        !self.particles.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn cancel_timer(&mut self, scheduler: &mut Scheduler) {
        if let Some(handle) = self.task.take() {
            scheduler.cancel(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{PARTICLE_COUNT, PARTICLE_FADE, PARTICLE_SPEED};

    #[test]
    fn test_burst_is_symmetric() {
        let burst = ParticleBurst::new(1, Vec2::new(100.0, 100.0), PARTICLE_COUNT, PARTICLE_SPEED);
        assert_eq!(burst.particles.len(), 8);

        let total: Vec2 = burst.particles.iter().map(|p| p.vel).sum();
        assert!(total.length() < 0.001);
        for p in &burst.particles {
            assert!((p.vel.length() - 5.0).abs() < 0.001);
            assert_eq!(p.opacity, 1.0);
        }
        // First spark heads right, third straight down
        assert!((burst.particles[0].vel - Vec2::new(5.0, 0.0)).length() < 0.001);
        assert!((burst.particles[2].vel - Vec2::new(0.0, 5.0)).length() < 0.001);
    }

    #[test]
    fn test_step_moves_and_fades() {
        let mut burst = ParticleBurst::new(1, Vec2::ZERO, PARTICLE_COUNT, PARTICLE_SPEED);
        assert!(burst.step(PARTICLE_FADE));
        let first = burst.particles[0];
        assert!((first.pos - Vec2::new(5.0, 0.0)).length() < 0.001);
        assert!((first.opacity - 0.95).abs() < 0.001);
    }

    #[test]
    fn test_burst_self_terminates() {
        let mut burst = ParticleBurst::new(1, Vec2::ZERO, PARTICLE_COUNT, PARTICLE_SPEED);
        let mut ticks = 1;
        while burst.step(PARTICLE_FADE) {
            ticks += 1;
            assert!(ticks <= 25, "burst never faded");
        }
        assert!(burst.is_finished());
        // 1.0 / 0.05 = 20 ticks, give or take float rounding
        assert!((20..=21).contains(&ticks));
    }
}

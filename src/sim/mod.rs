//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Virtual millisecond clock, advanced only by the caller
//! - Seeded RNG only
//! - Every timer is a cancellable task in one queue
//! - No rendering or platform dependencies (drawing goes through `RenderPort`)

pub mod interaction;
pub mod motion;
pub mod particles;
pub mod scheduler;
pub mod spawner;
pub mod state;
pub mod tick;

/// Identifier shared by viruses and particle bursts
pub type ObjectId = u32;

pub use interaction::{Activation, Ignored, activate};
pub use motion::{FallingObject, MotionOutcome};
pub use particles::{Particle, ParticleBurst};
pub use scheduler::{Scheduler, Task, TaskHandle};
pub use spawner::Spawner;
pub use state::{GameEvent, Hud, Session, SessionStatus, StatusLabel};
pub use tick::{Game, ShellAction};

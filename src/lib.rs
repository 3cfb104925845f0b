//! Nexus Defense - falling-virus mini-game for the IP Nexus site
//!
//! Core modules:
//! - `sim`: Deterministic simulation (session, spawning, motion, particles)
//! - `renderer`: Render port the simulation draws through
//! - `platform`: Browser shell (DOM rendering, input wiring)
//! - `tuning`: Data-driven game balance

pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use renderer::RenderPort;
pub use sim::{Game, GameEvent, Hud, SessionStatus, ShellAction, StatusLabel};
pub use tuning::{TierSpec, Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Motion tick for falling viruses (ms)
    pub const MOTION_TICK_MS: u64 = 30;
    /// Particle animation tick (ms)
    pub const PARTICLE_TICK_MS: u64 = 30;
    /// Delay between a virus being destroyed and its removal (ms)
    pub const REMOVAL_DELAY_MS: u64 = 300;

    /// Virus sprite is a 40x40 square
    pub const OBJECT_SIZE: f32 = 40.0;

    /// Viewport used until the shell reports the real canvas size
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 800.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 600.0;

    /// Score awarded per destroyed virus
    pub const DESTROY_REWARD: u64 = 100;

    /// Destruction burst
    pub const PARTICLE_COUNT: usize = 8;
    pub const PARTICLE_SPEED: f32 = 5.0; // px per tick
    pub const PARTICLE_FADE: f32 = 0.05; // opacity lost per tick

    /// Difficulty tiers: (starts at elapsed ms, fall speed px/tick, spawn interval ms)
    pub const TIERS: [(u64, f32, u64); 3] = [(0, 2.0, 1500), (15_000, 3.0, 1200), (30_000, 4.0, 1000)];

    /// Longest frame the shell feeds into the simulation (tab switches etc.)
    pub const MAX_FRAME_MS: f64 = 100.0;
}

//! Render port
//!
//! The simulation never touches a drawing surface directly. It calls these
//! hooks as viruses and sparks come and go; the browser shell implements them
//! with DOM elements, tests and the native demo use the headless ports.

pub mod headless;

pub use headless::{LogRenderer, RecordingRenderer, RenderCall};

use glam::Vec2;

use crate::sim::{ObjectId, Particle};

/// Drawing hooks called by [`crate::sim::Game`]. All default to no-ops.
pub trait RenderPort {
    /// A virus appeared with its top-left corner at `pos`
    fn create_object(&mut self, _id: ObjectId, _pos: Vec2) {}

    fn move_object(&mut self, _id: ObjectId, _pos: Vec2) {}

    /// Virus was hit; show the death animation
    fn mark_destroyed(&mut self, _id: ObjectId) {}

    fn remove_object(&mut self, _id: ObjectId) {}

    fn create_burst(&mut self, _id: ObjectId, _particles: &[Particle]) {}

    fn update_burst(&mut self, _id: ObjectId, _particles: &[Particle]) {}

    fn remove_burst(&mut self, _id: ObjectId) {}
}

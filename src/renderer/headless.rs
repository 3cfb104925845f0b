//! Render ports that draw nothing

use std::collections::BTreeSet;

use glam::Vec2;

use super::RenderPort;
use crate::sim::{ObjectId, Particle};

/// Traces every call through the `log` facade (native demo)
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRenderer;

impl RenderPort for LogRenderer {
    fn create_object(&mut self, id: ObjectId, pos: Vec2) {
        log::trace!("virus {} appears at x={:.0}", id, pos.x);
    }

    fn move_object(&mut self, id: ObjectId, pos: Vec2) {
        log::trace!("virus {} at y={:.0}", id, pos.y);
    }

    fn mark_destroyed(&mut self, id: ObjectId) {
        log::trace!("virus {} hit", id);
    }

    fn remove_object(&mut self, id: ObjectId) {
        log::trace!("virus {} removed", id);
    }

    fn create_burst(&mut self, id: ObjectId, particles: &[Particle]) {
        log::trace!("burst {} with {} sparks", id, particles.len());
    }

    fn remove_burst(&mut self, id: ObjectId) {
        log::trace!("burst {} faded", id);
    }
}

/// One recorded render call
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    Create(ObjectId, Vec2),
    Move(ObjectId, Vec2),
    MarkDestroyed(ObjectId),
    Remove(ObjectId),
    CreateBurst(ObjectId, usize),
    UpdateBurst(ObjectId, usize),
    RemoveBurst(ObjectId),
}

/// Keeps every call plus the set of things currently on screen
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    pub calls: Vec<RenderCall>,
    on_screen: BTreeSet<ObjectId>,
    bursts: BTreeSet<ObjectId>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Viruses created and not yet removed
    pub fn objects_on_screen(&self) -> usize {
        self.on_screen.len()
    }

    /// Bursts created and not yet removed
    pub fn bursts_on_screen(&self) -> usize {
        self.bursts.len()
    }

    pub fn count(&self, predicate: impl Fn(&RenderCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }
}

impl RenderPort for RecordingRenderer {
    fn create_object(&mut self, id: ObjectId, pos: Vec2) {
        self.on_screen.insert(id);
        self.calls.push(RenderCall::Create(id, pos));
    }

    fn move_object(&mut self, id: ObjectId, pos: Vec2) {
        self.calls.push(RenderCall::Move(id, pos));
    }

    fn mark_destroyed(&mut self, id: ObjectId) {
        self.calls.push(RenderCall::MarkDestroyed(id));
    }

    fn remove_object(&mut self, id: ObjectId) {
        self.on_screen.remove(&id);
        self.calls.push(RenderCall::Remove(id));
    }

    fn create_burst(&mut self, id: ObjectId, particles: &[Particle]) {
        self.bursts.insert(id);
        self.calls.push(RenderCall::CreateBurst(id, particles.len()));
    }

    fn update_burst(&mut self, id: ObjectId, particles: &[Particle]) {
        self.calls.push(RenderCall::UpdateBurst(id, particles.len()));
    }

    fn remove_burst(&mut self, id: ObjectId) {
        self.bursts.remove(&id);
        self.calls.push(RenderCall::RemoveBurst(id));
    }
}

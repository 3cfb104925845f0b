//! Game loop on a virtual clock
//!
//! [`Game`] owns the session, spawner, live viruses, particle bursts and the
//! timer queue. The shell feeds it [`ShellAction`]s and elapsed time; every
//! timer that fires is dispatched here, one at a time, in due order.

use glam::Vec2;

use super::ObjectId;
use super::interaction::{self, Activation};
use super::motion::{FallingObject, MotionOutcome};
use super::particles::ParticleBurst;
use super::scheduler::{Scheduler, Task};
use super::spawner::Spawner;
use super::state::{GameEvent, Hud, Session};
use crate::renderer::RenderPort;
use crate::tuning::{TierSpec, Tuning, TuningError};

/// Input from the surrounding page
#[derive(Debug, Clone, PartialEq)]
pub enum ShellAction {
    /// Show the game overlay
    Open,
    /// Hide the overlay and reset
    Close,
    Start,
    /// Reset, then start
    Restart,
    /// Key press (`"Escape"` closes an open overlay)
    Key(String),
    /// Pointer activation on a rendered virus
    Activate(ObjectId),
    /// Pointer activation at a canvas point; hits the topmost live virus there
    ActivateAt(Vec2),
    /// Canvas size changed
    Resize { width: f32, height: f32 },
}

/// The mini-game runtime
pub struct Game<R: RenderPort> {
    tuning: Tuning,
    session: Session,
    spawner: Spawner,
    scheduler: Scheduler,
    /// Live and dying viruses, in spawn order
    objects: Vec<FallingObject>,
    bursts: Vec<ParticleBurst>,
    viewport: Vec2,
    overlay_open: bool,
    events: Vec<GameEvent>,
    renderer: R,
    next_id: ObjectId,
}

impl<R: RenderPort> Game<R> {
    /// Create an idle game. Fails if the tuning is unusable.
    pub fn new(tuning: Tuning, renderer: R) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            session: Session::new(tuning.reward),
            spawner: Spawner::new(tuning.seed),
            scheduler: Scheduler::new(),
            objects: Vec::new(),
            bursts: Vec::new(),
            viewport: Vec2::new(tuning.viewport_width, tuning.viewport_height),
            overlay_open: false,
            events: Vec::new(),
            renderer,
            next_id: 1,
            tuning,
        })
    }

    /// Apply one shell input
    pub fn handle(&mut self, action: ShellAction) {
        match action {
            ShellAction::Open => self.open(),
            ShellAction::Close => self.close(),
            ShellAction::Start => {
                self.start();
            }
            ShellAction::Restart => self.restart(),
            ShellAction::Key(key) => {
                if key == "Escape" && self.overlay_open {
                    self.close();
                }
            }
            ShellAction::Activate(id) => {
                self.activate(id);
            }
            ShellAction::ActivateAt(point) => {
                self.activate_at(point);
            }
            ShellAction::Resize { width, height } => self.resize(width, height),
        }
    }

    pub fn open(&mut self) {
        if !self.overlay_open {
            self.overlay_open = true;
            log::info!("Game overlay opened");
        }
    }

    /// Closing always tears the session down
    pub fn close(&mut self) {
        if self.overlay_open {
            self.overlay_open = false;
            log::info!("Game overlay closed");
        }
        self.reset();
    }

    /// Start a session from Idle or Over; the first virus spawns immediately
    pub fn start(&mut self) -> bool {
        if !self.session.start(&mut self.scheduler, &self.tuning) {
            return false;
        }
        self.spawner.begin(&mut self.scheduler);
        log::info!("Session {} started", self.session.generation());
        self.events.push(GameEvent::Started);

        let now = self.scheduler.now();
        self.run_until(now);
        true
    }

    /// Back to Idle, cancelling every pending timer
    pub fn reset(&mut self) {
        self.session.reset(&mut self.scheduler);
        self.spawner.stop(&mut self.scheduler);
        self.clear_objects();
        self.clear_bursts();
        self.events.push(GameEvent::Reset);
        log::debug!("Session reset ({} tasks left)", self.scheduler.len());
    }

    pub fn restart(&mut self) {
        self.reset();
        self.start();
    }

    /// Pointer activation on virus `id`. Returns true if it was destroyed.
    pub fn activate(&mut self, id: ObjectId) -> bool {
        let active = self.session.is_active();
        let object = self.objects.iter_mut().find(|o| o.id == id);
        let outcome = interaction::activate(
            object,
            active,
            &mut self.scheduler,
            self.tuning.removal_delay_ms,
            self.tuning.object_size,
        );

        match outcome {
            Activation::Ignored(reason) => {
                log::debug!("Activation of virus {} ignored: {:?}", id, reason);
                false
            }
            Activation::Destroyed { center } => {
                self.session.report_destroyed();
                self.renderer.mark_destroyed(id);
                self.spawn_burst(center);

                let score = self.session.score();
                log::debug!("Virus {} destroyed, score {}", id, score);
                self.events.push(GameEvent::Destroyed { id, score });
                true
            }
        }
    }

    /// Pointer activation at a canvas point
    pub fn activate_at(&mut self, point: Vec2) -> bool {
        let size = self.tuning.object_size;
        // Later spawns are drawn on top
        let hit = self
            .objects
            .iter()
            .rev()
            .find(|o| o.alive && o.contains(point, size))
            .map(|o| o.id);
        match hit {
            Some(id) => self.activate(id),
            None => false,
        }
    }

    /// New canvas size; applies to viruses spawned from now on
    pub fn resize(&mut self, width: f32, height: f32) {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            log::warn!("Ignoring invalid viewport {}x{}", width, height);
            return;
        }
        self.viewport = Vec2::new(width, height);
    }

    /// Advance the virtual clock by `dt_ms`, firing every timer that comes due
    pub fn advance(&mut self, dt_ms: u64) {
        let target = self.scheduler.now().saturating_add(dt_ms);
        self.run_until(target);
    }

    fn run_until(&mut self, target: u64) {
        loop {
            let before = self.scheduler.now();
            let Some((due, task)) = self.scheduler.pop_due(target) else {
                break;
            };
            // Session time is exact at each task's due time
            self.session.advance_clock(due.saturating_sub(before));
            self.run_task(task);
        }
        let before = self.scheduler.now();
        self.scheduler.advance_to(target);
        self.session.advance_clock(self.scheduler.now() - before);
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::Spawn => self.on_spawn(),
            Task::Escalate { tier, session } => self.on_escalate(tier, session),
            Task::Motion(id) => self.on_motion(id),
            Task::Remove(id) => self.on_remove(id),
            Task::Particles(id) => self.on_particles(id),
        }
    }

    fn on_spawn(&mut self) {
        self.spawner.fired();
        if !self.session.is_active() {
            return;
        }

        let tier = self.difficulty();
        let id = self.next_entity_id();
        let mut object = self
            .spawner
            .spawn(id, self.viewport, self.tuning.object_size, &tier);
        object.motion = Some(
            self.scheduler
                .schedule(self.tuning.motion_tick_ms, Task::Motion(id)),
        );

        self.renderer.create_object(id, object.pos);
        log::debug!(
            "Spawned virus {} at x={:.0} (tier {}, speed {})",
            id,
            object.pos.x,
            self.session.tier(),
            object.speed
        );
        self.events.push(GameEvent::Spawned {
            id,
            x: object.pos.x,
        });
        self.objects.push(object);

        self.spawner
            .schedule_next(&mut self.scheduler, tier.spawn_interval_ms);
    }

    fn on_escalate(&mut self, tier: u8, session: u32) {
        let now = self.scheduler.now();
        if self.session.escalate(tier, session, now) {
            let params = self.difficulty();
            log::info!(
                "Difficulty tier {}: speed {}, spawn every {}ms",
                tier,
                params.speed,
                params.spawn_interval_ms
            );
            self.events.push(GameEvent::TierChanged { tier });
        }
    }

    fn on_motion(&mut self, id: ObjectId) {
        let active = self.session.is_active();
        let Some(object) = self.objects.iter_mut().find(|o| o.id == id) else {
            return;
        };
        object.motion = None;
        if !active || !object.alive {
            return;
        }

        let breached = match object.step() {
            MotionOutcome::Falling => {
                self.renderer.move_object(id, object.pos);
                object.motion = Some(
                    self.scheduler
                        .schedule(self.tuning.motion_tick_ms, Task::Motion(id)),
                );
                false
            }
            MotionOutcome::Breached => {
                self.renderer.move_object(id, object.pos);
                true
            }
        };
        if breached {
            self.breach(id);
        }
    }

    fn on_remove(&mut self, id: ObjectId) {
        let Some(index) = self.objects.iter().position(|o| o.id == id) else {
            return;
        };
        // Only viruses in their death animation are removed this way
        if self.objects[index].alive {
            return;
        }
        self.objects.remove(index);
        self.renderer.remove_object(id);
    }

    fn on_particles(&mut self, id: ObjectId) {
        let Some(index) = self.bursts.iter().position(|b| b.id == id) else {
            return;
        };
        let burst = &mut self.bursts[index];
        burst.task = None;
        if burst.step(self.tuning.particle_fade) {
            self.renderer.update_burst(id, &burst.particles);
            burst.task = Some(
                self.scheduler
                    .schedule(self.tuning.particle_tick_ms, Task::Particles(id)),
            );
        } else {
            self.bursts.remove(index);
            self.renderer.remove_burst(id);
        }
    }

    fn breach(&mut self, id: ObjectId) {
        if !self.session.report_breach(&mut self.scheduler) {
            return;
        }
        self.spawner.stop(&mut self.scheduler);
        self.clear_objects();

        let final_score = self.session.score();
        log::info!("Breach by virus {}: final score {}", id, final_score);
        self.events.push(GameEvent::Breach { id, final_score });
    }

    fn spawn_burst(&mut self, center: Vec2) {
        let id = self.next_entity_id();
        let mut burst = ParticleBurst::new(
            id,
            center,
            self.tuning.particle_count,
            self.tuning.particle_speed,
        );
        if burst.is_finished() {
            return;
        }
        self.renderer.create_burst(id, &burst.particles);
        burst.task = Some(
            self.scheduler
                .schedule(self.tuning.particle_tick_ms, Task::Particles(id)),
        );
        self.bursts.push(burst);
    }

    fn clear_objects(&mut self) {
        for mut object in self.objects.drain(..) {
            object.cancel_timers(&mut self.scheduler);
            self.renderer.remove_object(object.id);
        }
    }

    fn clear_bursts(&mut self) {
        for mut burst in self.bursts.drain(..) {
            burst.cancel_timer(&mut self.scheduler);
            self.renderer.remove_burst(burst.id);
        }
    }

    fn next_entity_id(&mut self) -> ObjectId {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    // === Read access for the shell ===

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.session.score(),
            destroyed: self.session.destroyed(),
            status: self.session.label(),
            final_score: self.session.final_score(),
            tier: self.session.tier(),
            overlay_open: self.overlay_open,
        }
    }

    /// Speed and spawn interval for the current tier
    pub fn difficulty(&self) -> TierSpec {
        self.tuning.tier(self.session.tier())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn objects(&self) -> &[FallingObject] {
        &self.objects
    }

    pub fn bursts(&self) -> &[ParticleBurst] {
        &self.bursts
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn is_overlay_open(&self) -> bool {
        self.overlay_open
    }

    /// Virtual time (ms)
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now()
    }

    /// Timers still waiting to fire
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

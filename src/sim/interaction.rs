//! Pointer activation on a falling virus

use glam::Vec2;

use super::motion::FallingObject;
use super::scheduler::{Scheduler, Task};

/// Why an activation did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ignored {
    /// No session running
    NotActive,
    /// Already removed (or never existed)
    Missing,
    /// Hit again during its death animation
    AlreadyDestroyed,
}

/// What an activation did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activation {
    /// Virus destroyed; sparks go at `center`
    Destroyed { center: Vec2 },
    Ignored(Ignored),
}

/// Destroy `object` if it is alive and the session is active.
///
/// Stops its motion right away (so it can no longer breach) and queues its
/// removal `removal_delay_ms` later.
pub fn activate(
    object: Option<&mut FallingObject>,
    session_active: bool,
    scheduler: &mut Scheduler,
    removal_delay_ms: u64,
    object_size: f32,
) -> Activation {
    if !session_active {
        return Activation::Ignored(Ignored::NotActive);
    }
    let Some(object) = object else {
        return Activation::Ignored(Ignored::Missing);
    };
    if !object.alive {
        return Activation::Ignored(Ignored::AlreadyDestroyed);
    }

    object.alive = false;
    if let Some(handle) = object.motion.take() {
        scheduler.cancel(handle);
    }
    object.removal = Some(scheduler.schedule(removal_delay_ms, Task::Remove(object.id)));

    Activation::Destroyed {
        center: object.center(object_size),
    }
}

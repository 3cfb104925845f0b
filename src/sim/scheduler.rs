//! Virtual timer queue
//!
//! Stands in for the browser's setTimeout/setInterval. Every pending timer is
//! a [`Task`] keyed by a [`TaskHandle`]; whoever schedules a task keeps the
//! handle so it can cancel it later. Tasks run in (due time, insertion) order.

use std::collections::BTreeMap;

use super::ObjectId;

/// Identifies one pending task. Ordering is (due, insertion sequence).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskHandle {
    due: u64,
    seq: u64,
}

impl TaskHandle {
    /// Virtual time (ms) at which the task fires
    pub fn due(&self) -> u64 {
        self.due
    }
}

/// Work a timer performs when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Spawn the next virus
    Spawn,
    /// Raise difficulty to `tier`, only for the session that scheduled it
    Escalate { tier: u8, session: u32 },
    /// Advance one virus by one motion tick
    Motion(ObjectId),
    /// Remove a destroyed virus after its death animation
    Remove(ObjectId),
    /// Advance one particle burst
    Particles(ObjectId),
}

/// Single-threaded timer queue on a virtual millisecond clock
#[derive(Debug, Default)]
pub struct Scheduler {
    now: u64,
    next_seq: u64,
    queue: BTreeMap<TaskHandle, Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time (ms)
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Queue `task` to fire `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: u64, task: Task) -> TaskHandle {
        let handle = TaskHandle {
            due: self.now.saturating_add(delay_ms),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.queue.insert(handle, task);
        handle
    }

    /// Cancel a pending task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        self.queue.remove(&handle).is_some()
    }

    /// Whether `handle` is still waiting to fire
    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.queue.contains_key(&handle)
    }

    /// Pop the earliest task due at or before `until` with its due time,
    /// moving the clock there
    pub fn pop_due(&mut self, until: u64) -> Option<(u64, Task)> {
        let (&handle, _) = self.queue.first_key_value()?;
        if handle.due > until {
            return None;
        }
        let task = self.queue.remove(&handle)?;
        self.now = self.now.max(handle.due);
        Some((handle.due, task))
    }

    /// Move the clock forward without running anything
    pub fn advance_to(&mut self, time: u64) {
        self.now = self.now.max(time);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

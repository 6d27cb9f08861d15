use std::collections::VecDeque;

use crate::nav::screen::ScreenId;

/// Lifecycle propagation scheduled for the next event-loop iteration.
///
/// Mount hooks may need to query state that only exists once the visual
/// tree changes from a navigation are fully applied, so propagation never
/// runs inline with the stack mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deferred {
    Mount(ScreenId),
    Unmount(ScreenId),
}

/// FIFO queue of deferred lifecycle work, drained once per tick by the
/// host's event loop.
///
/// Two rapid navigations may both have entries pending; a stale entry for a
/// screen that was popped again before the drain is harmless, because
/// `mount`/`unmount` are guarded by the component's current state.
#[derive(Debug, Default)]
pub struct TickQueue {
    queue: VecDeque<Deferred>,
}

impl TickQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, task: Deferred) {
        self.queue.push_back(task);
    }

    /// Takes everything currently scheduled, in order.
    pub fn drain(&mut self) -> Vec<Deferred> {
        self.queue.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

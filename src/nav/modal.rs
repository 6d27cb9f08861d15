use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::nav::screen::ScreenId;

/// Reserved context key holding a modal instance's [`ModalResult`].
pub const MODAL_RESULT_KEY: &str = "modal.result";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModalStatus {
    Pending,
    Success,
    Cancel,
    Failure,
}

/// Outcome of a modal interaction, correlated back to the opener via the
/// callback id it was opened with.
///
/// Created `Pending` at open time and finalized exactly once, *before* the
/// modal requests its own close; the close operation only tears down
/// structure and broadcasts whatever result was set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalResult {
    pub status: ModalStatus,
    pub payload: Option<Value>,
    pub callback_id: Option<String>,
}

impl ModalResult {
    pub fn pending(callback_id: Option<String>) -> Self {
        Self { status: ModalStatus::Pending, payload: None, callback_id }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ModalStatus::Pending
    }
}

/// One open overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalEntry {
    pub template_id: ScreenId,
    pub instance_id: String,
    pub callback_id: Option<String>,
}

/// Ordered sequence of currently open overlays for one controller.
///
/// Close order is LIFO relative to open order; at most one entry per
/// template id may be open at a time. While the stack is empty the modal
/// layer reports interaction disabled, so input passes through to the
/// screen below.
#[derive(Debug, Default)]
pub struct ModalStack {
    entries: Vec<ModalEntry>,
    next_instance: u64,
    interaction_enabled: bool,
}

impl ModalStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self) -> Option<&ModalEntry> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModalEntry> {
        self.entries.iter()
    }

    pub fn contains_template(&self, template_id: &ScreenId) -> bool {
        self.entries.iter().any(|entry| &entry.template_id == template_id)
    }

    pub fn find(&self, instance_id: &str) -> Option<&ModalEntry> {
        self.entries.iter().find(|entry| entry.instance_id == instance_id)
    }

    pub fn is_top(&self, instance_id: &str) -> bool {
        self.top().is_some_and(|entry| entry.instance_id == instance_id)
    }

    /// Whether the modal layer should accept input at all.
    pub fn interaction_enabled(&self) -> bool {
        self.interaction_enabled
    }

    /// Allocates a unique instance id: template id plus a monotonic
    /// disambiguator, so reopening a template later never reuses a store.
    pub fn next_instance_id(&mut self, template_id: &ScreenId) -> String {
        let instance = format!("{}#{}", template_id, self.next_instance);
        self.next_instance += 1;
        instance
    }

    /// Pushes an entry. Rejects a second entry for an already-open
    /// template. Returns whether the entry was accepted.
    pub fn push(&mut self, entry: ModalEntry) -> bool {
        if self.contains_template(&entry.template_id) {
            return false;
        }
        self.entries.push(entry);
        self.interaction_enabled = true;
        true
    }

    pub fn pop(&mut self) -> Option<ModalEntry> {
        let entry = self.entries.pop();
        if self.entries.is_empty() {
            self.interaction_enabled = false;
        }
        entry
    }

    /// Removes an entry from anywhere in the stack by instance id.
    pub fn remove(&mut self, instance_id: &str) -> Option<ModalEntry> {
        let index = self.entries.iter().position(|entry| entry.instance_id == instance_id)?;
        let entry = self.entries.remove(index);
        if self.entries.is_empty() {
            self.interaction_enabled = false;
        }
        Some(entry)
    }
}

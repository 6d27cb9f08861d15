use crate::nav::screen::ScreenId;

/// Back-history for one controller: ordered screen ids, oldest first.
///
/// Invariants: no two adjacent entries are equal, and once the stack holds a
/// root entry it never drops below one entry through `pop_top`.
#[derive(Debug, Default, Clone)]
pub struct NavigationStack {
    entries: Vec<ScreenId>,
}

impl NavigationStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self) -> Option<&ScreenId> {
        self.entries.last()
    }

    /// The entry directly beneath the top, if any.
    pub fn below_top(&self) -> Option<&ScreenId> {
        self.entries.len().checked_sub(2).and_then(|i| self.entries.get(i))
    }

    pub fn contains(&self, id: &ScreenId) -> bool {
        self.entries.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScreenId> {
        self.entries.iter()
    }

    /// Appends `id`. Pushing the current top again is a no-op, not a
    /// duplicate entry. Returns whether anything changed.
    pub fn push(&mut self, id: ScreenId) -> bool {
        if self.top() == Some(&id) {
            return false;
        }
        self.entries.push(id);
        true
    }

    /// Removes and returns the top entry. Refuses to pop the root: returns
    /// `None` when the stack holds one entry or fewer.
    pub fn pop_top(&mut self) -> Option<ScreenId> {
        if self.entries.len() <= 1 {
            return None;
        }
        self.entries.pop()
    }

    /// Inserts `id` directly beneath the top, for background preloads. Kept
    /// out of positions that would create adjacent duplicates. Returns
    /// whether anything changed.
    pub fn insert_below_top(&mut self, id: ScreenId) -> bool {
        if self.entries.is_empty() {
            self.entries.push(id);
            return true;
        }
        if self.top() == Some(&id) || self.below_top() == Some(&id) {
            return false;
        }
        self.entries.insert(self.entries.len() - 1, id);
        true
    }

    /// Removes the topmost occurrence of `id` from anywhere in the stack.
    pub fn remove(&mut self, id: &ScreenId) -> bool {
        match self.entries.iter().rposition(|entry| entry == id) {
            Some(index) => {
                self.entries.remove(index);
                self.entries.dedup();
                true
            }
            None => false,
        }
    }

    /// Removes every occurrence of `id`.
    pub fn remove_all(&mut self, id: &ScreenId) {
        self.entries.retain(|entry| entry != id);
        self.entries.dedup();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

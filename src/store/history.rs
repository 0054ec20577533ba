use std::collections::VecDeque;

use log::debug;

use super::{OsmMetaState, OsmMetaStore};

pub const DEFAULT_LIMIT: usize = 50;

/// Bounded undo/redo history over the persisted slice. Only committed
/// states are recorded; the newest snapshot always mirrors the store's
/// current committed state. Derived data is never part of a snapshot.
pub struct History {
    past: VecDeque<OsmMetaState>,
    future: Vec<OsmMetaState>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

impl History {
    pub fn new(limit: usize) -> History {
        History {
            past: VecDeque::new(),
            future: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Snapshots `state` unless its commit counter matches the newest
    /// snapshot. The oldest snapshot is dropped once the cap is reached,
    /// and any redo states are discarded.
    pub fn record(&mut self, state: &OsmMetaState) {
        if self
            .past
            .back()
            .is_some_and(|newest| newest.commit_counter == state.commit_counter)
        {
            return;
        }
        if self.past.len() == self.limit {
            self.past.pop_front();
        }
        self.past.push_back(state.clone());
        self.future.clear();
        debug!(commit_counter = state.commit_counter, depth = self.past.len(); "Recorded history snapshot");
    }

    pub fn can_undo(&self) -> bool {
        self.past.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.past.len()
    }

    /// Travels one committed step back, restoring the previous state into
    /// the store. Returns false when there is nothing left to undo.
    pub fn undo(&mut self, store: &mut OsmMetaStore) -> bool {
        if !self.can_undo() {
            return false;
        }
        let Some(current) = self.past.pop_back() else {
            return false;
        };
        self.future.push(current);
        match self.past.back() {
            Some(previous) => {
                store.restore(previous.clone());
                true
            }
            None => false,
        }
    }

    /// Travels one committed step forward again.
    pub fn redo(&mut self, store: &mut OsmMetaStore) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        store.restore(next.clone());
        if self.past.len() == self.limit {
            self.past.pop_front();
        }
        self.past.push_back(next);
        true
    }
}

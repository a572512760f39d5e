//! Registry of pending cleanup actions keyed by registration id.

use reclaim_core::Result;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

/// Work a registration performs when it is cleaned
pub(crate) type CleanupFn = Box<dyn FnOnce() -> Result<()> + Send>;

/// Reports whether the registered owner is still reachable
type LivenessProbe = Box<dyn Fn() -> bool + Send + Sync>;

/// A registered action together with the owner it is waiting on
pub(crate) struct CleanupEntry {
    pub(crate) description: String,
    owner_alive: LivenessProbe,
    pub(crate) action: CleanupFn,
}

impl CleanupEntry {
    fn is_reachable(&self) -> bool {
        (self.owner_alive)()
    }
}

/// Registry for tracking owners and the actions to run once they are gone
pub(crate) struct CleanupRegistry {
    entries: HashMap<u64, CleanupEntry>,
    next_id: u64,
}

impl CleanupRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::with_capacity(16),
            next_id: 0,
        }
    }

    /// Register an action that becomes eligible once `owner` has no strong references
    pub(crate) fn register<O>(&mut self, owner: &Arc<O>, description: String, action: CleanupFn) -> u64
    where
        O: ?Sized + Send + Sync + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;

        let owner: Weak<O> = Arc::downgrade(owner);
        self.entries.insert(
            id,
            CleanupEntry {
                description,
                owner_alive: Box::new(move || owner.strong_count() > 0),
                action,
            },
        );

        id
    }

    /// Remove an entry so that only the caller can run it
    pub(crate) fn take(&mut self, id: u64) -> Option<CleanupEntry> {
        self.entries.remove(&id)
    }

    /// Remove every entry whose owner is no longer reachable
    pub(crate) fn take_unreachable(&mut self) -> Vec<CleanupEntry> {
        let dead: Vec<u64> = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_reachable())
            .map(|(id, _)| *id)
            .collect();

        dead.into_iter()
            .filter_map(|id| self.entries.remove(&id))
            .collect()
    }

    pub(crate) fn contains(&self, id: u64) -> bool {
        self.entries.contains_key(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

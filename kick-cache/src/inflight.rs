//! Registry of fetches currently running, keyed by URL.
//!
//! Each slot holds a shared handle to one spawned fetch. Callers that miss
//! the store clone the handle instead of starting a second fetch. Slots carry
//! an id so a finishing fetch only ever clears its own slot.

use std::collections::HashMap;

use futures::future::{BoxFuture, Shared};

use kick_core::error::Result;

/// Shared outcome of one fetch, cloned to every waiter.
pub(crate) type SharedFetch<V> = Shared<BoxFuture<'static, Result<Option<V>>>>;

struct Slot<V> {
    id: u64,
    fetch: SharedFetch<V>,
}

pub(crate) struct InFlightRegistry<V> {
    slots: HashMap<String, Slot<V>>,
    next_id: u64,
}

impl<V> InFlightRegistry<V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: HashMap::new(),
            next_id: 0,
        }
    }

    /// Returns the running fetch for `key`, if any.
    pub(crate) fn get(&self, key: &str) -> Option<SharedFetch<V>> {
        self.slots.get(key).map(|slot| slot.fetch.clone())
    }

    /// Reserves an id for a fetch about to be registered.
    pub(crate) fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub(crate) fn insert(&mut self, key: String, id: u64, fetch: SharedFetch<V>) {
        self.slots.insert(key, Slot { id, fetch });
    }

    /// Clears the slot for `key` if it still belongs to fetch `id`.
    ///
    /// Returns false if the slot was missing or owned by another fetch.
    pub(crate) fn complete(&mut self, key: &str, id: u64) -> bool {
        match self.slots.get(key) {
            Some(slot) if slot.id == id => {
                self.slots.remove(key);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }
}

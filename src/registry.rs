//! EventRegistry — event key → ordered listener entries.
//!
//! Plain data; the emitter owns one behind its lock. Sequence order is
//! registration order and survives removals. A key whose sequence becomes
//! empty is dropped so that [`EventRegistry::event_names`] only reports live
//! channels.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::callback::Callback;
use crate::id::CallbackId;
use crate::key::EventKey;

/// One registered listener.
#[derive(Debug, Clone)]
pub struct ListenerEntry {
    pub callback: Callback,
    /// Remove after the first emit that reaches it.
    pub once: bool,
    /// Shared by every snapshot clone of this entry.
    fired: Arc<AtomicBool>,
}

impl ListenerEntry {
    pub fn new(callback: Callback, once: bool) -> Self {
        Self {
            callback,
            once,
            fired: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> CallbackId {
        self.callback.id()
    }

    /// Mark a `once` entry as fired. Returns `false` if this entry, or any
    /// clone of it, was already claimed. Always `true` for recurring entries.
    pub fn claim(&self) -> bool {
        !self.once || !self.fired.swap(true, Ordering::SeqCst)
    }
}

pub struct EventRegistry<K: EventKey> {
    events: HashMap<K, Vec<ListenerEntry>>,
    /// Keys in first-registration order.
    order: Vec<K>,
}

impl<K: EventKey> EventRegistry<K> {
    pub fn new() -> Self {
        Self {
            events: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn count(&self, event: &K) -> usize {
        self.events.get(event).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Append `entry` to the end of `event`'s sequence.
    pub fn push(&mut self, event: K, entry: ListenerEntry) {
        match self.events.get_mut(&event) {
            Some(entries) => entries.push(entry),
            None => {
                self.order.push(event.clone());
                self.events.insert(event, vec![entry]);
            }
        }
    }

    /// Remove the entry with `id` from `event`. Returns `None` if absent.
    pub fn remove(&mut self, event: &K, id: CallbackId) -> Option<ListenerEntry> {
        let entries = self.events.get_mut(event)?;
        let pos = entries.iter().position(|e| e.id() == id)?;
        let entry = entries.remove(pos);
        if entries.is_empty() {
            self.drop_key(event);
        }
        Some(entry)
    }

    /// Clone of `event`'s sequence as it is right now.
    pub fn snapshot(&self, event: &K) -> Vec<ListenerEntry> {
        self.events.get(event).cloned().unwrap_or_default()
    }

    /// Drop every entry of `event`. Returns how many were dropped.
    pub fn clear_event(&mut self, event: &K) -> usize {
        let removed = self.events.get(event).map_or(0, Vec::len);
        if removed > 0 {
            self.drop_key(event);
        }
        removed
    }

    /// Drop every entry of every event. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let removed = self.events.values().map(Vec::len).sum();
        self.events.clear();
        self.order.clear();
        removed
    }

    /// Keys with at least one entry, in first-registration order.
    pub fn event_names(&self) -> Vec<K> {
        self.order.clone()
    }

    fn drop_key(&mut self, event: &K) {
        self.events.remove(event);
        self.order.retain(|k| k != event);
    }
}

impl<K: EventKey> Default for EventRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

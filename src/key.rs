//! EventKey — names the channels of an emitter.
//!
//! Each owning component defines its own closed key type (usually an enum)
//! and an emitter is generic over it. Two keys per type are reserved for the
//! built-in meta-events fired on registry mutation.

use std::fmt::Debug;
use std::hash::Hash;

use crate::callback::Callback;

/// Argument delivered to `new_listener` / `remove_listener` meta listeners:
/// the event the listener was registered on and the listener's callback.
pub type MetaEvent<K> = (K, Callback);

/// A channel identifier for [`Emitter`](crate::Emitter).
pub trait EventKey: Clone + Eq + Hash + Debug + Send + Sync + 'static {
    /// Key fired after every successful registration.
    fn new_listener() -> Self;

    /// Key fired after every successful individual removal.
    fn remove_listener() -> Self;
}

impl EventKey for String {
    fn new_listener() -> Self {
        "newListener".to_string()
    }

    fn remove_listener() -> Self {
        "removeListener".to_string()
    }
}

impl EventKey for &'static str {
    fn new_listener() -> Self {
        "newListener"
    }

    fn remove_listener() -> Self {
        "removeListener"
    }
}

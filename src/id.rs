//! Process-wide callback identity.
//!
//! Ids start at 1 and only ever grow; 0 is reserved for the empty callback.
//! The counter is a relaxed atomic, so ids stay unique across every emitter
//! in the process even if callbacks are bound on different threads.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a bound callback. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallbackId(u64);

impl CallbackId {
    /// The id carried by empty callbacks.
    pub const EMPTY: CallbackId = CallbackId(0);

    /// Wrap a raw value. Intended for logs, tests and serialized handles;
    /// it does not reserve the id.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl Default for CallbackId {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Allocate the next callback id.
pub fn next_id() -> CallbackId {
    CallbackId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
}

//! Event dispatch core for reactor-driven I/O components.
//!
//! # Modules
//!
//! - [`id`] — process-wide [`CallbackId`] allocator.
//! - [`callback`] — type-erased, identity-bearing [`Callback`].
//! - [`key`] — the [`EventKey`] trait and meta-event keys.
//! - [`registry`] — [`EventRegistry`] of ordered [`ListenerEntry`]s.
//! - [`emitter`] — [`Emitter<K>`]: add/remove/emit and meta-events.
//! - [`rollback`] — [`rollback_scope`] listen-then-try helper.
//! - [`config`] — [`EmitterConfig`].
//! - [`error`] — [`EmitterError`] and [`EmitError`].

pub mod callback;
pub mod config;
pub mod emitter;
pub mod error;
pub mod id;
pub mod key;
pub mod registry;
pub mod rollback;

pub use callback::Callback;
pub use config::{EmitterConfig, DEFAULT_MAX_LISTENERS};
pub use emitter::Emitter;
pub use error::{EmitError, EmitterError, ListenerError, ListenerResult, Result};
pub use id::{next_id, CallbackId};
pub use key::{EventKey, MetaEvent};
pub use registry::{EventRegistry, ListenerEntry};
pub use rollback::rollback_scope;

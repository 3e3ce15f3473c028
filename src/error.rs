use thiserror::Error;

use crate::id::CallbackId;

// ---------------------------------------------------------------------------
// ListenerError
// ---------------------------------------------------------------------------

/// The error a listener body returns to abort dispatch.
///
/// It is carried back to the caller of `emit` untouched, so listeners can use
/// any error type that boxes into it (`?` on most errors, or `"text".into()`).
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// What every listener body returns.
pub type ListenerResult = std::result::Result<(), ListenerError>;

// ---------------------------------------------------------------------------
// EmitterError
// ---------------------------------------------------------------------------

/// Registry and wiring errors raised by the emitter itself.
#[derive(Debug, Error)]
pub enum EmitterError {
    /// `add_listener` was refused because the event already holds `limit`
    /// entries. The registry is unchanged.
    #[error("Max listeners ({limit}) reached for event {event}")]
    ListenerLimitExceeded { event: String, limit: usize },

    /// A callback was invoked with an argument type it was not bound for.
    #[error(
        "Callback #{id} expects arguments of type `{expected}` but was invoked with `{received}`"
    )]
    InvocationTypeMismatch {
        id: CallbackId,
        expected: &'static str,
        received: &'static str,
    },

    #[error("Attempted to invoke an empty callback")]
    EmptyCallbackInvoked,

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Invalid emitter configuration: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// EmitError
// ---------------------------------------------------------------------------

/// Failure of a single dispatch.
///
/// `Dispatch` means the emitter and a listener disagree on wiring; `Listener`
/// is the listener's own error, passed through verbatim.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error(transparent)]
    Dispatch(#[from] EmitterError),

    #[error(transparent)]
    Listener(ListenerError),
}

impl EmitError {
    /// The listener's own error, if that is what stopped dispatch.
    pub fn into_listener_error(self) -> Option<ListenerError> {
        match self {
            Self::Listener(e) => Some(e),
            Self::Dispatch(_) => None,
        }
    }

    /// True when dispatch failed because of a wiring defect rather than a
    /// listener-reported error.
    pub fn is_dispatch(&self) -> bool {
        matches!(self, Self::Dispatch(_))
    }
}

/// Convenience alias — the default error type is `EmitterError`.
pub type Result<T, E = EmitterError> = std::result::Result<T, E>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

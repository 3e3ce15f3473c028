use evented::EmitError;
use thiserror::Error;

// ---------------------------------------------------------------------------
// ReactorError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ReactorError {
    #[error("Reactor \"{0}\" is disposed")]
    Disposed(String),

    #[error("Reactor must be created inside a tokio runtime")]
    NoRuntime,

    /// A completion's dispatch failed; carries the emit error verbatim.
    #[error(transparent)]
    Dispatch(#[from] EmitError),
}

// ---------------------------------------------------------------------------
// ResolveError
// ---------------------------------------------------------------------------

/// Payload of `ResolverEvent::Error`. Cloneable so every listener gets a copy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Invalid host name: {0:?}")]
    InvalidHost(String),

    #[error("Lookup of {host} failed: {message}")]
    Lookup { host: String, message: String },

    #[error("No addresses found for {0}")]
    NoAddresses(String),
}

impl ResolveError {
    pub fn host(&self) -> &str {
        match self {
            Self::InvalidHost(host) => host,
            Self::Lookup { host, .. } => host,
            Self::NoAddresses(host) => host,
        }
    }
}

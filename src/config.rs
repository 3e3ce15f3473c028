//! Emitter configuration.

use serde::{Deserialize, Serialize};

use crate::error::{EmitterError, Result};

/// Default per-event listener cap.
pub const DEFAULT_MAX_LISTENERS: usize = 10;

/// Options for constructing an [`Emitter`](crate::Emitter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmitterConfig {
    /// Maximum entries per event key at registration time. `0` disables the cap.
    pub max_listeners: usize,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            max_listeners: DEFAULT_MAX_LISTENERS,
        }
    }
}

impl EmitterConfig {
    /// A config with no listener cap.
    pub fn unlimited() -> Self {
        Self { max_listeners: 0 }
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|e| EmitterError::Config(e.to_string()))
    }
}

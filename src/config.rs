//! Engine configuration
//!
//! Every limit the engine enforces is a constructor-time value collected
//! here. Hosts can build an [`EngineConfig`] in code or load one from YAML
//! (`~/.config/gapstore/config.yaml` for the bundled binary).

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::buffer::DEFAULT_INITIAL_CAPACITY;

/// Default cap on retained undo sequences per buffer
pub const DEFAULT_MAX_SEQUENCES: usize = 100;
/// Default cap on retained undo text per buffer (1 MiB)
pub const DEFAULT_MAX_MEMORY: usize = 1024 * 1024;
/// Default coalescing window in milliseconds
pub const DEFAULT_SEQUENCE_TIMEOUT_MS: u64 = 500;
/// Default cap on live buffers
pub const DEFAULT_MAX_BUFFERS: usize = 50;
/// Default cap on live scratch buffers
pub const DEFAULT_MAX_SCRATCH_BUFFERS: usize = 10;

fn default_max_sequences() -> usize {
    DEFAULT_MAX_SEQUENCES
}

fn default_max_memory() -> usize {
    DEFAULT_MAX_MEMORY
}

fn default_sequence_timeout_ms() -> u64 {
    DEFAULT_SEQUENCE_TIMEOUT_MS
}

fn default_initial_capacity() -> usize {
    DEFAULT_INITIAL_CAPACITY
}

fn default_max_buffers() -> usize {
    DEFAULT_MAX_BUFFERS
}

fn default_max_scratch_buffers() -> usize {
    DEFAULT_MAX_SCRATCH_BUFFERS
}

/// Limits for one change tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum committed sequences kept before the oldest are evicted
    #[serde(default = "default_max_sequences")]
    pub max_sequences: usize,
    /// Maximum bytes of recorded text kept before the oldest sequences are evicted
    #[serde(default = "default_max_memory")]
    pub max_memory: usize,
    /// Edits closer together than this collapse into one undo step
    #[serde(default = "default_sequence_timeout_ms")]
    pub sequence_timeout_ms: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_sequences: default_max_sequences(),
            max_memory: default_max_memory(),
            sequence_timeout_ms: default_sequence_timeout_ms(),
        }
    }
}

impl HistoryConfig {
    pub fn sequence_timeout(&self) -> Duration {
        Duration::from_millis(self.sequence_timeout_ms)
    }
}

/// Limits and defaults for a [`BufferManager`](crate::manager::BufferManager)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Capacity of the gap buffer behind each new managed buffer
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,
    /// Maximum live buffers, scratch and named together
    #[serde(default = "default_max_buffers")]
    pub max_buffers: usize,
    /// Maximum live scratch buffers
    #[serde(default = "default_max_scratch_buffers")]
    pub max_scratch_buffers: usize,
    /// Undo limits handed to every tracker
    #[serde(default)]
    pub history: HistoryConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_capacity: default_initial_capacity(),
            max_buffers: default_max_buffers(),
            max_scratch_buffers: default_max_scratch_buffers(),
            history: HistoryConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a YAML document; missing keys take their defaults
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Load config from the default location, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`, falling back to defaults on any problem
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

//! Configuration system

pub use serde::{Deserialize, Serialize};

use crate::physics::Tags;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Default candidate count at which a step's edge tests fan out to worker threads
pub const DEFAULT_PARALLEL_SCAN_THRESHOLD: usize = 32;

/// Layer registry configuration
///
/// Which gameplay tags get their own spatial layer is a per-game decision, so it
/// lives here rather than in code. Step length, chunk size and the candidate soft
/// cap are fixed in [`crate::consts`].
///
/// ```toml
/// layers = "ENVIRONMENT | ENEMY"
/// parallel_scan_threshold = 32
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Every tag bit set here gets its own layer
    pub layers: Tags,

    /// Candidate count at or above which edge tests run on worker threads
    pub parallel_scan_threshold: usize,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            layers: Tags::ENVIRONMENT,
            parallel_scan_threshold: DEFAULT_PARALLEL_SCAN_THRESHOLD,
        }
    }
}

impl Config for CollisionConfig {}

//! Error types for the fallible edges of the simulation.
//!
//! The frame loop itself cannot fail; errors only arise when loading a
//! configuration or assembling a field from a raw cluster sequence.

use std::fmt;

/// Errors that can occur while loading or validating a [`crate::config::Config`].
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    Io(std::io::Error),
    /// The file is not valid configuration JSON.
    Parse(serde_json::Error),
    /// A field holds a value the simulation cannot run with.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read config: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Errors that can occur when building a [`crate::field::ClusterField`]
/// from a single ordered sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The sequence holds no growing cluster at all.
    MissingGrowing,
    /// A growing cluster was found somewhere other than the last slot.
    MisplacedGrowing { index: usize, len: usize },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::MissingGrowing => {
                write!(f, "Cluster sequence has no growing cluster in its last slot")
            }
            FieldError::MisplacedGrowing { index, len } => write!(
                f,
                "Growing cluster at index {} of {}; it must be the last and only one",
                index, len
            ),
        }
    }
}

impl std::error::Error for FieldError {}

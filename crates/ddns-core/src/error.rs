//! Error types for the DDNS plugin system
//!
//! This module defines all error types used throughout the crate.

use std::path::PathBuf;
use thiserror::Error;

use crate::process::ProcessError;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS plugin system
#[derive(Error, Debug)]
pub enum Error {
    /// The external CLI could not be run at all
    ///
    /// Fatal to any update attempt; shown to the user as "tool not installed".
    #[error("The {program} CLI was not found in PATH")]
    CliUnavailable {
        /// Program that failed the version check
        program: String,
        /// Underlying process failure
        #[source]
        source: ProcessError,
    },

    /// The external CLI ran but reported a failure while updating a record
    ///
    /// The message stays generic; the raw CLI diagnostic is only reachable
    /// through [`std::error::Error::source`].
    #[error("The {program} command failed to update {record}")]
    UpdateFailed {
        /// Program that was invoked
        program: String,
        /// Record that was being updated
        record: String,
        /// Underlying process failure
        #[source]
        source: ProcessError,
    },

    /// The local profile configuration file could not be read
    #[error("Profile configuration unavailable at {}: {source}", .path.display())]
    ProfilesUnavailable {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Listing the hosted zones of one profile failed
    #[error("Zone discovery failed for profile '{profile}': {message}")]
    ZoneDiscoveryFailed {
        /// Profile being listed
        profile: String,
        /// What went wrong
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Host configuration store errors
    #[error("Config store error: {0}")]
    ConfigStore(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a "CLI unavailable" error
    pub fn cli_unavailable(program: impl Into<String>, source: ProcessError) -> Self {
        Self::CliUnavailable {
            program: program.into(),
            source,
        }
    }

    /// Create an "update failed" error
    pub fn update_failed(
        program: impl Into<String>,
        record: impl Into<String>,
        source: ProcessError,
    ) -> Self {
        Self::UpdateFailed {
            program: program.into(),
            record: record.into(),
            source,
        }
    }

    /// Create a "profiles unavailable" error
    pub fn profiles_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ProfilesUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Create a "zone discovery failed" error
    pub fn zone_discovery(profile: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ZoneDiscoveryFailed {
            profile: profile.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a config store error
    pub fn config_store(msg: impl Into<String>) -> Self {
        Self::ConfigStore(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

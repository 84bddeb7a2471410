//! Error types shared by every component of appscope

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring or running the boundary components
#[derive(Error, Debug)]
pub enum AppScopeError {
    /// Missing or conflicting inputs. The CLI reports these with usage text.
    #[error("{0}")]
    Configuration(String),

    #[error("Couldn't find the Android API version: {0}")]
    PlatformDetection(String),

    #[error("Failed to synthesize entry point: {0}")]
    EntrySynthesis(String),

    #[error("Invalid application pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open archive {}: {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Malformed dex index {}: {reason}", path.display())]
    MalformedIndex { path: PathBuf, reason: String },
}

impl AppScopeError {
    pub fn configuration(message: impl Into<String>) -> Self {
        AppScopeError::Configuration(message.into())
    }

    /// True for errors the CLI answers with usage text
    pub fn is_configuration(&self) -> bool {
        matches!(self, AppScopeError::Configuration(_))
    }
}

pub type Result<T> = std::result::Result<T, AppScopeError>;

//! Error types for settings loading, persistence, and proxy sync.

use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the settings core.
///
/// Queries never return these; they fall back to caller-supplied defaults.
/// Loaders and savers return them directly, and proxy sync collects them
/// per property.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file could not be read or written.
    #[error("settings io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings text is not valid JSON.
    #[error("settings parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Settings text parsed, but the document root is not a JSON object.
    #[error("settings document root must be a JSON object, found {0}")]
    RootNotObject(&'static str),

    /// A value exists but cannot be coerced to the requested type.
    #[error("setting '{path}' cannot be read as {expected}")]
    TypeMismatch { path: String, expected: &'static str },

    /// A fixed-size property received the wrong number of elements.
    #[error("setting '{path}' has {found} elements, property expects {expected}")]
    ElementCountMismatch {
        path: String,
        expected: usize,
        found: usize,
    },

    /// The proxy refused a property value.
    #[error("property '{property}' rejected value: {reason}")]
    PropertyRejected { property: String, reason: String },

    /// No home directory to place user settings in.
    #[error("could not determine home directory for user settings")]
    NoHomeDir,
}

pub type Result<T> = std::result::Result<T, SettingsError>;

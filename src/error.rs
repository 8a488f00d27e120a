//! Error types for the autolinks command line driver. The rewriting engine
//! itself never fails; these cover discovery, config, and output.

use std::path::PathBuf;

/// Every variant names the path or reason for failure so the rendered
/// diagnostic is useful without a debugger.
#[allow(clippy::error_impl_error, reason = "crate-level error type")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured or requested docs directory does not exist.
    #[error("docs directory not found: {}", path.display())]
    DocsDirNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization of the index listing failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped serde_json error.
        #[from]
        serde_json::Error,
    ),

    /// TOML deserialization of `.autolinks.toml` failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// Walking the docs directory failed.
    #[error("walk: {0}")]
    Walk(
        /// The wrapped walkdir error.
        #[from]
        walkdir::Error,
    ),
}

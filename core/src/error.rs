//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Only the fallible edges (parsing input text, fetching table metadata)
//! return errors. The transformations themselves are total.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Malformed JSON input.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// Malformed YAML input.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// Table metadata could not be fetched.
    /// Ignored for `From<String>` to avoid conflict with General.
    #[from(ignore)]
    #[display("Fetch Error: {_0}")]
    Fetch(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

#![deny(missing_docs)]

//! # CLI Errors
//!
//! Failures of the `repo` and `oas` commands. Core errors pass through with
//! their own message.

use derive_more::{Display, From};
use xano_docs_core::AppError;

/// Error of a CLI command.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// Reading the input or writing the output tree failed.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// Failure bubbled up from the core library.
    #[display("{}", _0)]
    Core(AppError),

    /// Bad input file or missing setting.
    #[display("Operation failed: {}", _0)]
    General(String),
}

impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_display_is_transparent() {
        let err: CliError = AppError::Fetch("down".into()).into();
        assert_eq!(err.to_string(), "Fetch Error: down");
    }

    #[test]
    fn test_general_from_string() {
        let err: CliError = String::from("nope").into();
        assert_eq!(err.to_string(), "Operation failed: nope");
    }
}

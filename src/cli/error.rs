//! CLI-level errors (wraps domain and config errors)

use std::path::PathBuf;

use thiserror::Error;

use crate::config::SettingsError;
use crate::domain::DomainError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Config(#[from] SettingsError),

    #[error("cannot read {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Domain(_) | CliError::Json(_) | CliError::InvalidInput(_) => {
                crate::exitcode::DATAERR
            }
            CliError::Config(_) => crate::exitcode::CONFIG,
            CliError::Input { .. } => crate::exitcode::NOINPUT,
            CliError::Io(_) => crate::exitcode::IOERR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let domain = CliError::from(DomainError::CycleDetected { id: 1 });
        assert_eq!(domain.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(
            CliError::InvalidInput("x".into()).exit_code(),
            crate::exitcode::DATAERR
        );
        let input = CliError::Input {
            path: PathBuf::from("missing.json"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(input.exit_code(), crate::exitcode::NOINPUT);
        assert!(input.to_string().contains("missing.json"));
    }
}

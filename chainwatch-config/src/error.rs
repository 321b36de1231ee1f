//! Error types for configuration loading and validation.

use std::path::PathBuf;

use thiserror::Error;

use crate::report::ConfigValidationError;

/// Unified configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Root configuration file not found.
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// Figment extraction error over the merged document.
    #[error("Configuration parsing error: {0}")]
    Parsing(#[from] figment::Error),

    /// I/O error.
    #[error("Configuration I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Aggregated structural and semantic failures.
    #[error("Invalid configuration:\n{}", format_report(.0))]
    Invalid(Vec<ConfigValidationError>),
}

impl ConfigError {
    /// The structured failures behind an `Invalid` error, if any.
    pub fn validation_errors(&self) -> &[ConfigValidationError] {
        match self {
            ConfigError::Invalid(errors) => errors,
            _ => &[],
        }
    }
}

fn format_report(errors: &[ConfigValidationError]) -> String {
    use std::fmt::Write;

    let mut output = String::new();
    for error in errors {
        let _ = writeln!(output, "  - {error}");
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ErrorCode;

    #[test]
    fn invalid_error_lists_every_failure() {
        let err = ConfigError::Invalid(vec![
            ConfigValidationError::new(ErrorCode::DuplicateResource, "duplicate 'ops'"),
            ConfigValidationError::new(ErrorCode::MissingEnvVar, "ETHERSCAN_KEY not set"),
        ]);
        let text = err.to_string();
        assert!(text.contains("duplicate 'ops'"));
        assert!(text.contains("ETHERSCAN_KEY not set"));
        assert_eq!(err.validation_errors().len(), 2);
    }
}

//! # CLI Errors
//!
//! Everything that can stop a command: bad input files, bad config, or a
//! pricing rule rejecting the input.

use std::path::PathBuf;

use rto_core::CoreError;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// The pricing engine rejected the input or configuration.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// pricing.toml is not valid TOML or has the wrong shape.
    #[error("Failed to load config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The effective config could not be rendered back to TOML.
    #[error("Failed to render config: {0}")]
    ConfigRender(#[from] toml::ser::Error),

    /// Output could not be serialized.
    #[error("Serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CliError::Read {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rto_core::ValidationError;

    #[test]
    fn test_core_errors_pass_through() {
        let err: CliError = CoreError::InvalidArgument(ValidationError::MustBePositive {
            field: "purchase price".to_string(),
        })
        .into();
        assert_eq!(
            err.to_string(),
            "Invalid argument: purchase price must be positive"
        );
    }

    #[test]
    fn test_read_error_names_path() {
        let err = CliError::read(
            "cart.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert_eq!(err.to_string(), "Failed to read cart.json: missing");
    }
}

use std::path::PathBuf;
use thiserror::Error;

use crate::resolver::ResolutionError;

/// Core error type for entryroot operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No entryroot.config.json found in {dir}")]
    ConfigNotFound { dir: PathBuf },

    #[error(transparent)]
    Entry(#[from] ConfigError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("{0}")]
    Other(String),
}

impl Error {
    #[must_use]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Stable code for machine-readable output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "IO_ERROR",
            Self::ConfigRead { .. } => "CONFIG_READ_FAILED",
            Self::ConfigParse { .. } => "CONFIG_PARSE_FAILED",
            Self::ConfigNotFound { .. } => "CONFIG_NOT_FOUND",
            Self::Entry(ConfigError::UnsupportedShape { .. }) => "ENTRY_UNSUPPORTED",
            Self::Entry(ConfigError::ThunkDepthExceeded { .. }) => "ENTRY_TOO_DEEP",
            Self::Resolution(_) => "ENTRY_UNRESOLVED",
            Self::Other(_) => "ERROR",
        }
    }
}

/// The entry configuration has a shape that cannot be normalized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cannot handle entry value of type `{shape}`")]
    UnsupportedShape { shape: String },

    #[error("entry functions nested deeper than {limit} levels")]
    ThunkDepthExceeded { limit: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ResolveReasonCode;

    #[test]
    fn test_entry_error_codes_follow_inner_variant() {
        let unsupported = Error::from(ConfigError::UnsupportedShape {
            shape: "number".to_string(),
        });
        assert_eq!(unsupported.code(), "ENTRY_UNSUPPORTED");

        let too_deep = Error::from(ConfigError::ThunkDepthExceeded { limit: 32 });
        assert_eq!(too_deep.code(), "ENTRY_TOO_DEEP");
        assert_eq!(
            too_deep.to_string(),
            "entry functions nested deeper than 32 levels"
        );
    }

    #[test]
    fn test_resolution_error_code() {
        let err = Error::from(ResolutionError::new(
            "./missing",
            "/proj",
            ResolveReasonCode::NotFound,
        ));
        assert_eq!(err.code(), "ENTRY_UNRESOLVED");
    }
}

//! # Sustain Core Configuration Errors
//!
//! Errors raised while reading, parsing or writing a
//! [`LoaderConfig`](super::LoaderConfig).
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Deserialization from '{format}' failed: {source}")]
    Parse {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Serialization to '{format}' failed: {source}")]
    Serialize {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl ConfigError {
    pub fn parse(format: &str, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        ConfigError::Parse {
            format: format.to_string(),
            source: Box::new(source),
        }
    }

    pub fn serialize(format: &str, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        ConfigError::Serialize {
            format: format.to_string(),
            source: Box::new(source),
        }
    }
}

use thiserror::Error;

use crate::parse::ParseError;
use crate::types::{BuildError, LoadError};

/// Unified error type covering parsing, loading, brewing, settings, and I/O.
///
/// Returned by convenience entry points like
/// [`Registry::from_text()`](crate::Registry::from_text) and
/// [`AlchemySettings::from_file()`](crate::AlchemySettings::from_file).
#[derive(Debug, Error)]
pub enum AlchemyError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("invalid settings: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Serialize(#[from] crate::serial::SerializeError),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Deserialize(#[from] crate::serial::DeserializeError),
}

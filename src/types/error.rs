use thiserror::Error;

use super::element::ElementKind;
use super::ingredient::{MAX_INGREDIENTS, MIN_INGREDIENTS};

/// A variable-only accessor was used on a section, or the other way around.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("element '{name}' is a {found}, expected a {expected}")]
pub struct ElementTypeMismatch {
    pub name: String,
    pub expected: ElementKind,
    pub found: ElementKind,
}

/// Errors produced when decoding parsed elements into ingredient records.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("record '{record}': {source}")]
    TypeMismatch {
        record: String,
        source: ElementTypeMismatch,
    },

    #[error("malformed record '{record}': {reason}")]
    MalformedRecord { record: String, reason: String },

    /// A `magnitude` or `duration` that is not a usable number. Only the
    /// ingredient carrying it is rejected.
    #[error("malformed record '{record}': invalid {field} '{value}' for effect '{effect}'")]
    InvalidNumber {
        record: String,
        effect: String,
        field: String,
        value: String,
    },
}

impl LoadError {
    /// Name of the record that failed to load.
    #[must_use]
    pub fn record(&self) -> &str {
        match self {
            LoadError::TypeMismatch { record, .. }
            | LoadError::MalformedRecord { record, .. }
            | LoadError::InvalidNumber { record, .. } => record,
        }
    }

    /// Whether the record did not have the shape of an ingredient at all.
    /// Structural errors abort a strict load.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        !matches!(self, LoadError::InvalidNumber { .. })
    }
}

/// Errors produced when combining ingredients into a potion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("at least {} ingredients are required, got {count}", MIN_INGREDIENTS)]
    InsufficientIngredients { count: usize },

    #[error("at most {} ingredients can be combined, got {count}", MAX_INGREDIENTS)]
    TooManyIngredients { count: usize },

    #[error("no ingredient matches '{name}'")]
    UnknownIngredient { name: String },

    #[error("the ingredients share no common effects")]
    BuildFailed,
}

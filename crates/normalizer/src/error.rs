//! Attribute deserialization errors

use thiserror::Error;

/// Structural problems in a tagged attribute map
///
/// Unsupported tags are not errors; they are omitted from maps and become
/// nulls inside lists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeError {
    /// `N` value that is not a decimal number
    #[error("invalid number at '{path}': {value:?}")]
    InvalidNumber { path: String, value: String },

    /// `N` value beyond the 1E-130..1E+125 magnitude a stream number can hold
    #[error("number out of range at '{path}': {value:?}")]
    NumberOutOfRange { path: String, value: String },
}

impl AttributeError {
    pub fn invalid_number(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            path: path.into(),
            value: value.into(),
        }
    }

    pub fn number_out_of_range(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self::NumberOutOfRange {
            path: path.into(),
            value: value.into(),
        }
    }
}

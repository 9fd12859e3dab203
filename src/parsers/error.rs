use thiserror::Error;

use crate::models::EntryType;

/// Errors returned when raw text cannot become a complete citation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unrecognized citation format")]
    UnrecognizedFormat,

    #[error("Malformed field `{field}`: {reason}")]
    MalformedField { field: &'static str, reason: String },

    #[error("Ambiguous author segmentation: {0}")]
    AmbiguousAuthorSegmentation(String),

    #[error("Unsupported entry type: {0}")]
    UnsupportedEntryType(String),
}

impl ParseError {
    pub(crate) fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        ParseError::MalformedField {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(field: &'static str, entry_type: EntryType) -> Self {
        Self::malformed(field, format!("required for {} entries", entry_type))
    }

    /// The offending field for [`ParseError::MalformedField`]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ParseError::MalformedField { field, .. } => Some(field),
            _ => None,
        }
    }
}

//! Score format support for buzzbox.
//!
//! Parses and writes the line-oriented text encoding the note extractor
//! produces: one `tempo` record and one `note` record per note.

mod score_format;

pub use score_format::{parse_score, write_score};

/// Error type for score parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatError {
    /// A `tempo`/`note` record with too few fields.
    MalformedRecord { line: usize },
    /// A record field that did not parse as a number.
    BadField { line: usize },
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatError::MalformedRecord { line } => {
                write!(f, "line {}: record is missing fields", line)
            }
            FormatError::BadField { line } => {
                write!(f, "line {}: field is not a valid number", line)
            }
        }
    }
}

impl std::error::Error for FormatError {}

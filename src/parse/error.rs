use thiserror::Error;

/// Errors produced when parsing registry text.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("parse error on line {line}: unmatched bracket")]
    UnmatchedBracket { line: usize },

    #[error("parse error on line {line}: more than one setter")]
    MultipleSetters { line: usize },

    #[error("input stream could not be read: {0}")]
    StreamUnreadable(#[from] std::io::Error),
}

impl ParseError {
    /// The 1-based line a syntax error occurred on.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::UnmatchedBracket { line } | ParseError::MultipleSetters { line } => {
                Some(*line)
            }
            ParseError::StreamUnreadable(_) => None,
        }
    }
}

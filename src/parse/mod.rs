mod config;
mod error;
mod grammar;
mod parser;
mod serialize;

use std::io::Read;

pub use config::ParserConfig;
pub use error::ParseError;
pub use serialize::{serialize, serialize_with};

use crate::types::Element;

/// Parse bracket-delimited text into a list of top-level [`Element`]s.
///
/// # Errors
///
/// Returns [`ParseError`] on unmatched brackets or repeated setters, unless
/// the corresponding toggle in `config` tolerates them.
pub fn parse(text: &str, config: &ParserConfig) -> Result<Vec<Element>, ParseError> {
    parser::parse_document(text, config)
}

/// Read a whole stream into memory and parse it.
///
/// # Errors
///
/// Returns [`ParseError::StreamUnreadable`] if the stream fails or is not
/// valid UTF-8, otherwise the same errors as [`parse`].
pub fn parse_reader(mut reader: impl Read, config: &ParserConfig) -> Result<Vec<Element>, ParseError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse(&text, config)
}

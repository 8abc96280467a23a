use std::iter;

use winnow::combinator::repeat;
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::{one_of, rest, take_till};

use super::config::ParserConfig;

/// One normalized line: comment-free, and holding at most one opening
/// bracket, which is always its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Line<'i> {
    /// 1-based physical line the text came from.
    pub number: usize,
    pub text: &'i str,
}

// -- Comments ---------------------------------------------------------------

fn code<'i>(input: &mut &'i str, config: &ParserConfig) -> ModalResult<&'i str> {
    take_till(0.., |c: char| config.is_comment(c)).parse_next(input)
}

// -- Brackets ---------------------------------------------------------------

/// `"Foo { a"` becomes `["Foo ", "{ a"]`.
fn bracket_chunks<'i>(input: &mut &'i str, config: &ParserConfig) -> ModalResult<Vec<&'i str>> {
    let open = |c: char| config.is_open_bracket(c);
    (
        take_till(0.., open),
        repeat(0.., (one_of(open), take_till(0.., open)).take()),
    )
        .map(|(head, tail): (&'i str, Vec<&'i str>)| iter::once(head).chain(tail).collect())
        .parse_next(input)
}

// -- Assignments ------------------------------------------------------------

fn assignment<'i>(input: &mut &'i str, config: &ParserConfig) -> ModalResult<(&'i str, &'i str)> {
    let setter = |c: char| config.is_setter(c);
    (take_till(0.., setter), one_of(setter), rest)
        .map(|(name, _, value)| (name, value))
        .parse_next(input)
}

/// Split a line at its first setter into raw `(name, value)` halves.
pub(crate) fn split_assignment<'i>(line: &'i str, config: &ParserConfig) -> Option<(&'i str, &'i str)> {
    let mut input = line;
    assignment(&mut input, config).ok()
}

pub(crate) fn count_setters(line: &str, config: &ParserConfig) -> usize {
    line.chars().filter(|&c| config.is_setter(c)).count()
}

// -- Normalization ----------------------------------------------------------

/// Break raw text into normalized lines.
///
/// Text is split on every line delimiter, comments are cut off, and each
/// opening bracket is moved to the start of a line of its own so bracket
/// handling is always whole-line.
pub(crate) fn normalize<'i>(text: &'i str, config: &ParserConfig) -> Vec<Line<'i>> {
    let mut lines = Vec::new();
    let mut number = 1;
    let mut start = 0;
    for (idx, c) in text.char_indices() {
        if config.is_line_delimiter(c) {
            push_segment(&text[start..idx], number, config, &mut lines);
            start = idx + c.len_utf8();
            if c == '\n' {
                number += 1;
            }
        }
    }
    push_segment(&text[start..], number, config, &mut lines);
    lines
}

fn push_segment<'i>(segment: &'i str, number: usize, config: &ParserConfig, out: &mut Vec<Line<'i>>) {
    let mut input = segment;
    let code = code(&mut input, config).unwrap_or(segment);
    let mut input = code;
    let chunks = bracket_chunks(&mut input, config).unwrap_or_else(|_| vec![code]);
    out.extend(
        chunks
            .into_iter()
            .filter(|chunk| !chunk.is_empty())
            .map(|text| Line { number, text }),
    );
}

// -- Trimming ---------------------------------------------------------------

pub(crate) fn trim_whitespace<'i>(text: &'i str, config: &ParserConfig) -> &'i str {
    text.trim_matches(|c: char| config.is_whitespace(c))
}

/// Strip whitespace and bracket characters from both ends.
pub(crate) fn trim_token<'i>(text: &'i str, config: &ParserConfig) -> &'i str {
    text.trim_matches(|c: char| config.is_whitespace(c) || config.is_bracket(c))
}

/// Remove one pair of matching quotes, reporting which quote it was.
pub(crate) fn unquote(text: &str) -> (&str, Option<char>) {
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first @ ('"' | '\'')), Some(last)) if first == last => {
            (&text[1..text.len() - 1], Some(first))
        }
        _ => (text, None),
    }
}

use std::fmt::Write as _;

use super::config::ParserConfig;
use crate::types::Element;

const INDENT: &str = "    ";

/// Render elements back into registry text using the default setter.
#[must_use]
pub fn serialize(elements: &[Element]) -> String {
    serialize_with(elements, &ParserConfig::default())
}

/// Render elements back into registry text using `config`'s first setter
/// and the first opening/closing bracket pair.
#[must_use]
pub fn serialize_with(elements: &[Element], config: &ParserConfig) -> String {
    let setter = config.canonical_setter();
    let open = config.open_brackets.chars().next().unwrap_or('{');
    let close = config.close_brackets.chars().next().unwrap_or('}');
    let mut out = String::new();
    for element in elements {
        write_element(&mut out, element, 0, setter, (open, close));
    }
    out
}

fn write_element(
    out: &mut String,
    element: &Element,
    depth: usize,
    setter: char,
    (open, close): (char, char),
) {
    let pad = INDENT.repeat(depth);
    match element {
        Element::Variable { name, value, quote } => {
            let _ = match quote {
                Some(q) => writeln!(out, "{pad}{name} {setter} {q}{value}{q}"),
                None => writeln!(out, "{pad}{name} {setter} {value}"),
            };
        }
        Element::Section { name, children } => {
            let _ = writeln!(out, "{pad}{name}");
            let _ = writeln!(out, "{pad}{open}");
            for child in children {
                write_element(out, child, depth + 1, setter, (open, close));
            }
            let _ = writeln!(out, "{pad}{close}");
        }
    }
}

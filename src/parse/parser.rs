use std::mem;

use tracing::debug;

use super::config::ParserConfig;
use super::error::ParseError;
use super::grammar::{self, Line};
use crate::types::Element;

type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug)]
enum Slot {
    Variable {
        name: String,
        value: String,
        quote: Option<char>,
    },
    Section {
        name: String,
        children: Vec<NodeId>,
    },
}

#[derive(Debug)]
struct Node {
    slot: Slot,
    parent: Option<NodeId>,
    /// Bracket that opened this section; `None` for the root and variables.
    open: Option<char>,
    line: usize,
}

/// Flat node storage used while a document is being built.
///
/// Children and parents are indices into `nodes`, so the insertion point can
/// move up and down the tree without holding references into it.
#[derive(Debug)]
struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    fn new() -> Self {
        Self {
            nodes: vec![Node {
                slot: Slot::Section {
                    name: String::new(),
                    children: Vec::new(),
                },
                parent: None,
                open: None,
                line: 0,
            }],
        }
    }

    fn push(&mut self, parent: NodeId, slot: Slot, open: Option<char>, line: usize) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            slot,
            parent: Some(parent),
            open,
            line,
        });
        if let Slot::Section { children, .. } = &mut self.nodes[parent].slot {
            children.push(id);
        }
        id
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    /// Walk `levels` parents up from `id`.
    fn ancestor(&self, id: NodeId, levels: usize) -> NodeId {
        (0..levels).fold(id, |at, _| self.parent(at).unwrap_or(ROOT))
    }

    fn into_elements(mut self) -> Vec<Element> {
        let top = match &mut self.nodes[ROOT].slot {
            Slot::Section { children, .. } => mem::take(children),
            Slot::Variable { .. } => Vec::new(),
        };
        top.into_iter().map(|id| self.take(id)).collect()
    }

    fn take(&mut self, id: NodeId) -> Element {
        match &mut self.nodes[id].slot {
            Slot::Variable { name, value, quote } => Element::Variable {
                name: mem::take(name),
                value: mem::take(value),
                quote: *quote,
            },
            Slot::Section { name, children } => {
                let name = mem::take(name);
                let children = mem::take(children);
                Element::Section {
                    name,
                    children: children.into_iter().map(|child| self.take(child)).collect(),
                }
            }
        }
    }
}

/// Line-by-line tree builder with an explicit insertion point.
struct Builder<'c> {
    config: &'c ParserConfig,
    arena: Arena,
    current: NodeId,
    header: Option<String>,
}

impl<'c> Builder<'c> {
    fn new(config: &'c ParserConfig) -> Self {
        Self {
            config,
            arena: Arena::new(),
            current: ROOT,
            header: None,
        }
    }

    fn line(&mut self, line: &Line<'_>) -> Result<(), ParseError> {
        let text = grammar::trim_whitespace(line.text, self.config);
        if text.is_empty() {
            return Ok(());
        }

        // Closing brackets take effect once the rest of the line is attributed.
        let mut pops = 0;
        for c in text.chars() {
            if self.config.is_open_bracket(c) {
                self.open(c, line.number);
            } else if self.config.is_close_bracket(c) && self.close(c, pops, line.number)? {
                pops += 1;
            }
        }

        let setters = grammar::count_setters(text, self.config);
        if setters > 1 && !self.config.multiple_setters {
            return Err(ParseError::MultipleSetters { line: line.number });
        }

        match grammar::split_assignment(text, self.config) {
            Some((name, value)) => self.variable(name, value, line.number),
            None => {
                let header = grammar::trim_token(text, self.config);
                if !header.is_empty() {
                    self.header = Some(header.to_owned());
                }
            }
        }

        self.current = self.arena.ancestor(self.current, pops);
        Ok(())
    }

    fn open(&mut self, bracket: char, line: usize) {
        let name = self.header.take().unwrap_or_default();
        let slot = Slot::Section {
            name,
            children: Vec::new(),
        };
        self.current = self.arena.push(self.current, slot, Some(bracket), line);
    }

    /// Validate a closing bracket against the section it would close, given
    /// `pending` closes already queued on this line. Returns whether a pop
    /// should be queued.
    fn close(&self, bracket: char, pending: usize, line: usize) -> Result<bool, ParseError> {
        let target = self.arena.ancestor(self.current, pending);
        let open = if target == ROOT {
            None
        } else {
            self.arena.nodes[target].open
        };
        match open {
            Some(open) if self.config.brackets_pair(open, bracket) => Ok(true),
            Some(_) if self.config.fuzzy_brackets => Ok(true),
            None if self.config.fuzzy_brackets => Ok(false),
            _ => Err(ParseError::UnmatchedBracket { line }),
        }
    }

    fn variable(&mut self, name: &str, value: &str, line: usize) {
        let name = grammar::trim_token(name, self.config);
        let value = grammar::trim_token(value, self.config);
        let (value, quote) = grammar::unquote(value);
        let slot = Slot::Variable {
            name: name.to_owned(),
            value: value.to_owned(),
            quote,
        };
        self.arena.push(self.current, slot, None, line);
    }

    fn finish(self) -> Result<Vec<Element>, ParseError> {
        if self.current != ROOT && !self.config.fuzzy_brackets {
            return Err(ParseError::UnmatchedBracket {
                line: self.arena.nodes[self.current].line,
            });
        }
        Ok(self.arena.into_elements())
    }
}

pub(crate) fn parse_document(text: &str, config: &ParserConfig) -> Result<Vec<Element>, ParseError> {
    let lines = grammar::normalize(text, config);
    let mut builder = Builder::new(config);
    for line in &lines {
        builder.line(line)?;
    }
    let elements = builder.finish()?;
    debug!(lines = lines.len(), elements = elements.len(), "parsed document");
    Ok(elements)
}

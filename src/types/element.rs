use std::fmt;

use super::error::ElementTypeMismatch;
use super::value::Value;

/// The two kinds of node a parsed document is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Variable,
    Section,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Variable => write!(f, "variable"),
            ElementKind::Section => write!(f, "section"),
        }
    }
}

/// A node in a parsed document tree.
///
/// Variables carry a single raw string value; sections own an ordered list of
/// child elements. `quote` records the quote character a value was wrapped in
/// so the serializer can put it back.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Variable {
        name: String,
        value: String,
        quote: Option<char>,
    },
    Section {
        name: String,
        children: Vec<Element>,
    },
}

impl Element {
    /// Create an unquoted variable node.
    #[must_use]
    pub fn variable(name: impl Into<String>, value: impl Into<String>) -> Self {
        Element::Variable {
            name: name.into(),
            value: value.into(),
            quote: None,
        }
    }

    /// Create a section node from its children.
    #[must_use]
    pub fn section(name: impl Into<String>, children: Vec<Element>) -> Self {
        Element::Section {
            name: name.into(),
            children,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Element::Variable { name, .. } | Element::Section { name, .. } => name,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Variable { .. } => ElementKind::Variable,
            Element::Section { .. } => ElementKind::Section,
        }
    }

    #[must_use]
    pub fn is_section(&self) -> bool {
        matches!(self, Element::Section { .. })
    }

    /// The raw value of a variable.
    ///
    /// # Errors
    ///
    /// Returns [`ElementTypeMismatch`] if this element is a section.
    pub fn value(&self) -> Result<&str, ElementTypeMismatch> {
        match self {
            Element::Variable { value, .. } => Ok(value),
            Element::Section { .. } => Err(self.mismatch(ElementKind::Variable)),
        }
    }

    /// The value of a variable, disambiguated into a number, bool or string.
    ///
    /// # Errors
    ///
    /// Returns [`ElementTypeMismatch`] if this element is a section.
    pub fn typed_value(&self) -> Result<Value, ElementTypeMismatch> {
        match self {
            Element::Variable {
                value,
                quote: Some(_),
                ..
            } => Ok(Value::String(value.clone())),
            Element::Variable { value, .. } => Ok(Value::infer(value)),
            Element::Section { .. } => Err(self.mismatch(ElementKind::Variable)),
        }
    }

    /// The children of a section.
    ///
    /// # Errors
    ///
    /// Returns [`ElementTypeMismatch`] if this element is a variable.
    pub fn children(&self) -> Result<&[Element], ElementTypeMismatch> {
        match self {
            Element::Section { children, .. } => Ok(children),
            Element::Variable { .. } => Err(self.mismatch(ElementKind::Section)),
        }
    }

    /// Find the first direct child with the given name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ElementTypeMismatch`] if this element is a variable.
    pub fn child(&self, name: &str) -> Result<Option<&Element>, ElementTypeMismatch> {
        Ok(self
            .children()?
            .iter()
            .find(|c| super::names_match(c.name(), name)))
    }

    fn mismatch(&self, expected: ElementKind) -> ElementTypeMismatch {
        ElementTypeMismatch {
            name: self.name().to_owned(),
            expected,
            found: self.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_accessors() {
        let e = Element::variable("magnitude", "10");
        assert_eq!(e.name(), "magnitude");
        assert_eq!(e.kind(), ElementKind::Variable);
        assert_eq!(e.value().unwrap(), "10");
        assert_eq!(e.typed_value().unwrap(), Value::Number(10.0));
    }

    #[test]
    fn quoted_variable_is_always_a_string() {
        let e = Element::Variable {
            name: "x".into(),
            value: "10".into(),
            quote: Some('"'),
        };
        assert_eq!(e.typed_value().unwrap(), Value::String("10".into()));
    }

    #[test]
    fn section_children() {
        let e = Element::section("Foo", vec![Element::variable("bar", "1")]);
        assert!(e.is_section());
        assert_eq!(e.children().unwrap().len(), 1);
        assert_eq!(e.child("BAR").unwrap().unwrap().value().unwrap(), "1");
        assert!(e.child("baz").unwrap().is_none());
    }

    #[test]
    fn wrong_accessor_is_a_type_mismatch() {
        let section = Element::section("Foo", vec![]);
        let err = section.value().unwrap_err();
        assert_eq!(err.expected, ElementKind::Variable);
        assert_eq!(err.found, ElementKind::Section);

        let variable = Element::variable("bar", "1");
        let err = variable.children().unwrap_err();
        assert_eq!(err.name, "bar");
        assert_eq!(err.expected, ElementKind::Section);
    }
}

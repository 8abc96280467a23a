use serde::Deserialize;

/// Character classes and toggles that drive the parser.
///
/// Every class is a set of characters written as a string, so `setters = "=:"`
/// makes both `=` and `:` assign a value to a name. Opening and closing
/// brackets pair up by position.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub line_delimiters: String,
    pub setters: String,
    pub open_brackets: String,
    pub close_brackets: String,
    pub comments: String,
    pub whitespace: String,
    /// Tolerate unmatched brackets instead of failing.
    pub fuzzy_brackets: bool,
    /// Tolerate more than one setter on a line; the first one splits.
    pub multiple_setters: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            line_delimiters: "\n;".to_owned(),
            setters: "=:".to_owned(),
            open_brackets: "{[(<".to_owned(),
            close_brackets: "}])>".to_owned(),
            comments: "#".to_owned(),
            whitespace: " \t\r\u{feff}".to_owned(),
            fuzzy_brackets: false,
            multiple_setters: false,
        }
    }
}

impl ParserConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_fuzzy_brackets(mut self, enabled: bool) -> Self {
        self.fuzzy_brackets = enabled;
        self
    }

    #[must_use]
    pub fn with_multiple_setters(mut self, enabled: bool) -> Self {
        self.multiple_setters = enabled;
        self
    }

    #[must_use]
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into();
        self
    }

    #[must_use]
    pub fn with_setters(mut self, setters: impl Into<String>) -> Self {
        self.setters = setters.into();
        self
    }

    #[must_use]
    pub fn is_line_delimiter(&self, c: char) -> bool {
        c == '\n' || self.line_delimiters.contains(c)
    }

    #[must_use]
    pub fn is_setter(&self, c: char) -> bool {
        self.setters.contains(c)
    }

    #[must_use]
    pub fn is_open_bracket(&self, c: char) -> bool {
        self.open_brackets.contains(c)
    }

    #[must_use]
    pub fn is_close_bracket(&self, c: char) -> bool {
        self.close_brackets.contains(c)
    }

    #[must_use]
    pub fn is_bracket(&self, c: char) -> bool {
        self.is_open_bracket(c) || self.is_close_bracket(c)
    }

    #[must_use]
    pub fn is_comment(&self, c: char) -> bool {
        self.comments.contains(c)
    }

    #[must_use]
    pub fn is_whitespace(&self, c: char) -> bool {
        self.whitespace.contains(c)
    }

    /// Whether `close` pairs with `open`. Brackets without a positional
    /// partner pair with anything.
    #[must_use]
    pub fn brackets_pair(&self, open: char, close: char) -> bool {
        let open_idx = self.open_brackets.chars().position(|c| c == open);
        let close_idx = self.close_brackets.chars().position(|c| c == close);
        let partners = self.close_brackets.chars().count();
        match (open_idx, close_idx) {
            (Some(o), Some(c)) if o < partners => o == c,
            _ => true,
        }
    }

    /// The setter written back out by the serializer.
    #[must_use]
    pub(crate) fn canonical_setter(&self) -> char {
        self.setters.chars().next().unwrap_or('=')
    }
}

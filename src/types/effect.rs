use std::cmp::Ordering;
use std::fmt;

use super::keyword::{Disposition, Keyword, KeywordSet};

/// A named property carried by an ingredient or a potion.
///
/// The null effect (empty name, magnitude `-0.0`, duration `0`) marks an empty
/// ingredient slot.
#[derive(Debug, Clone)]
pub struct Effect {
    pub name: String,
    pub magnitude: f64,
    pub duration: u32,
    pub keywords: KeywordSet,
}

impl Effect {
    #[must_use]
    pub fn new(name: impl Into<String>, magnitude: f64, duration: u32) -> Self {
        Self {
            name: name.into(),
            magnitude,
            duration,
            keywords: KeywordSet::new(),
        }
    }

    /// The empty-slot sentinel.
    #[must_use]
    pub fn null() -> Self {
        Self::new(String::new(), -0.0, 0)
    }

    /// Attach a keyword.
    #[must_use]
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        self.keywords.insert(keyword);
        self
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.name.is_empty()
            && self.magnitude == 0.0
            && self.magnitude.is_sign_negative()
            && self.duration == 0
    }

    #[must_use]
    pub fn is_beneficial(&self) -> bool {
        self.keywords.has_disposition(Disposition::Positive)
    }

    #[must_use]
    pub fn is_harmful(&self) -> bool {
        self.keywords.has_disposition(Disposition::Negative)
    }

    #[must_use]
    pub fn is_duration_based(&self) -> bool {
        self.keywords.iter().any(Keyword::is_duration_based)
    }

    /// Case-insensitive name comparison.
    #[must_use]
    pub fn name_matches(&self, name: &str) -> bool {
        super::names_match(&self.name, name)
    }
}

impl Default for Effect {
    fn default() -> Self {
        Self::null()
    }
}

impl PartialEq for Effect {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.magnitude == other.magnitude
    }
}

impl PartialOrd for Effect {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.name.cmp(&other.name) {
            Ordering::Equal => self.magnitude.partial_cmp(&other.magnitude),
            ord => Some(ord),
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}", self.name, self.magnitude)?;
        if self.duration > 0 {
            write!(f, " for {}s", self.duration)?;
        }
        write!(f, ")")
    }
}

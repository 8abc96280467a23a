use std::fmt;

/// How a keyword classifies the effect it is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Disposition {
    #[default]
    Unknown,
    Neutral,
    Positive,
    Negative,
    Cure,
    FortifyStat,
    InfluenceOther,
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Disposition::Unknown => "unknown",
            Disposition::Neutral => "neutral",
            Disposition::Positive => "positive",
            Disposition::Negative => "negative",
            Disposition::Cure => "cure",
            Disposition::FortifyStat => "fortify",
            Disposition::InfluenceOther => "influence",
        };
        f.write_str(s)
    }
}

pub const BENEFICIAL: &str = "MagicAlchBeneficial";
pub const HARMFUL: &str = "MagicAlchHarmful";
pub const DURATION_BASED: &str = "MagicAlchDurationBased";

enum Pattern {
    Exact(&'static str),
    Contains(&'static str),
}

/// Checked in order; the first hit decides the disposition.
const CATALOG: &[(Pattern, Disposition)] = &[
    (Pattern::Exact(BENEFICIAL), Disposition::Positive),
    (Pattern::Exact(HARMFUL), Disposition::Negative),
    (Pattern::Exact(DURATION_BASED), Disposition::Neutral),
    (Pattern::Contains("cure"), Disposition::Cure),
    (Pattern::Contains("fortify"), Disposition::FortifyStat),
    (Pattern::Contains("restore"), Disposition::FortifyStat),
    (Pattern::Contains("magicinfluence"), Disposition::InfluenceOther),
];

impl Disposition {
    /// Classify a keyword by its name.
    #[must_use]
    pub fn classify(name: &str) -> Disposition {
        let lower = name.to_ascii_lowercase();
        CATALOG
            .iter()
            .find(|(pattern, _)| match pattern {
                Pattern::Exact(s) => s.eq_ignore_ascii_case(name),
                Pattern::Contains(s) => lower.contains(s),
            })
            .map_or(Disposition::Unknown, |(_, d)| *d)
    }
}

/// An immutable effect tag identified by name or form id.
///
/// Two keywords are equal when either their names or their form ids match,
/// ignoring case.
#[derive(Debug, Clone)]
pub struct Keyword {
    name: String,
    form_id: String,
    disposition: Disposition,
}

impl Keyword {
    #[must_use]
    pub fn new(name: impl Into<String>, form_id: impl Into<String>) -> Self {
        let name = name.into();
        let disposition = Disposition::classify(&name);
        Self {
            name,
            form_id: form_id.into(),
            disposition,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    #[must_use]
    pub fn disposition(&self) -> Disposition {
        self.disposition
    }

    #[must_use]
    pub fn is_duration_based(&self) -> bool {
        self.name.eq_ignore_ascii_case(DURATION_BASED)
    }

    /// Whether this keyword matches a name or form id, ignoring case.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        self.name.eq_ignore_ascii_case(term)
            || (!self.form_id.is_empty() && self.form_id.eq_ignore_ascii_case(term))
    }
}

impl PartialEq for Keyword {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
            || (!self.form_id.is_empty() && self.form_id.eq_ignore_ascii_case(&other.form_id))
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// An insertion-ordered set of keywords.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordSet {
    keywords: Vec<Keyword>,
}

impl KeywordSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a keyword, returning `false` if an equal one is already present.
    pub fn insert(&mut self, keyword: Keyword) -> bool {
        if self.keywords.contains(&keyword) {
            return false;
        }
        self.keywords.push(keyword);
        true
    }

    /// Add every keyword from `other` not already present.
    pub fn extend_from(&mut self, other: &KeywordSet) {
        for kw in &other.keywords {
            self.insert(kw.clone());
        }
    }

    #[must_use]
    pub fn contains(&self, term: &str) -> bool {
        self.keywords.iter().any(|k| k.matches(term))
    }

    #[must_use]
    pub fn has_disposition(&self, disposition: Disposition) -> bool {
        self.keywords.iter().any(|k| k.disposition() == disposition)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.keywords.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl FromIterator<Keyword> for KeywordSet {
    fn from_iter<T: IntoIterator<Item = Keyword>>(iter: T) -> Self {
        let mut set = KeywordSet::new();
        for kw in iter {
            set.insert(kw);
        }
        set
    }
}

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::types::{Effect, Ingredient, Registry};

/// Which part of an ingredient a union search compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchTarget {
    #[default]
    Name,
    Effect,
}

/// How [`find_best_by_effect`] decides one ingredient beats another.
/// Comparisons are strictly greater-than, so ties keep the earlier ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankBy {
    #[default]
    Magnitude,
    Duration,
    /// Greater magnitude or greater duration.
    Either,
    /// Greater magnitude and greater duration.
    Both,
}

impl RankBy {
    fn beats(self, candidate: &Effect, best: &Effect) -> bool {
        let magnitude = candidate.magnitude > best.magnitude;
        let duration = candidate.duration > best.duration;
        match self {
            RankBy::Magnitude => magnitude,
            RankBy::Duration => duration,
            RankBy::Either => magnitude || duration,
            RankBy::Both => magnitude && duration,
        }
    }
}

/// A lowercased search term with its matching mode.
struct Matcher {
    term: String,
    exact: bool,
}

impl Matcher {
    fn new(term: &str, exact: bool) -> Self {
        Self {
            term: term.to_lowercase(),
            exact,
        }
    }

    fn matches(&self, candidate: &str) -> bool {
        let candidate = candidate.to_lowercase();
        if self.exact {
            candidate == self.term
        } else {
            candidate.contains(&self.term)
        }
    }

    fn matches_effect_of(&self, ingredient: &Ingredient) -> bool {
        ingredient.effects().any(|e| self.matches(&e.name))
    }
}

pub(crate) fn find_by_name<'r>(registry: &'r Registry, term: &str, exact: bool) -> Vec<&'r Ingredient> {
    let matcher = Matcher::new(term, exact);
    registry.iter().filter(|i| matcher.matches(&i.name)).collect()
}

pub(crate) fn find_by_effect<'r>(
    registry: &'r Registry,
    term: &str,
    exact: bool,
) -> Vec<&'r Ingredient> {
    let matcher = Matcher::new(term, exact);
    registry
        .iter()
        .filter(|i| matcher.matches_effect_of(i))
        .collect()
}

pub(crate) fn find_all_effects<'r>(
    registry: &'r Registry,
    terms: &[impl AsRef<str>],
    exact: bool,
) -> Vec<&'r Ingredient> {
    match terms.split_first() {
        Some((first, rest)) => {
            narrow(find_by_effect(registry, first.as_ref(), exact), rest, exact).unwrap_or_default()
        }
        None => Vec::new(),
    }
}

pub(crate) fn find_any<'r>(
    registry: &'r Registry,
    terms: &[impl AsRef<str>],
    exact: bool,
    target: SearchTarget,
) -> Vec<&'r Ingredient> {
    let matchers: Vec<Matcher> = terms.iter().map(|t| Matcher::new(t.as_ref(), exact)).collect();
    registry
        .iter()
        .filter(|ingredient| {
            matchers.iter().any(|m| match target {
                SearchTarget::Name => m.matches(&ingredient.name),
                SearchTarget::Effect => m.matches_effect_of(ingredient),
            })
        })
        .collect()
}

pub(crate) fn find_best_fit<'r>(registry: &'r Registry, term: &str) -> Option<&'r Ingredient> {
    registry
        .get(term)
        .or_else(|| find_by_name(registry, term, false).into_iter().next())
}

pub(crate) fn find_best_by_effect<'r>(
    registry: &'r Registry,
    effect: &str,
    rank_by: RankBy,
    excluded: &[impl AsRef<str>],
) -> Option<&'r Ingredient> {
    let excluded: HashSet<String> = excluded.iter().map(|n| n.as_ref().to_lowercase()).collect();
    let mut best: Option<(&Ingredient, &Effect)> = None;
    for ingredient in registry.iter() {
        if excluded.contains(&ingredient.name.to_lowercase()) {
            continue;
        }
        let Some(candidate) = ingredient.effect(effect) else {
            continue;
        };
        match best {
            Some((_, current)) if !rank_by.beats(candidate, current) => {}
            _ => best = Some((ingredient, candidate)),
        }
    }
    best.map(|(ingredient, _)| ingredient)
}

/// Intersect `candidates` with each term in turn. On the first term that
/// empties the set, returns that term. An already empty set stays empty
/// without blaming any term.
fn narrow<'r, 't>(
    mut candidates: Vec<&'r Ingredient>,
    terms: &'t [impl AsRef<str>],
    exact: bool,
) -> Result<Vec<&'r Ingredient>, &'t str> {
    if candidates.is_empty() {
        return Ok(candidates);
    }
    for term in terms {
        let term = term.as_ref();
        let matcher = Matcher::new(term, exact);
        candidates.retain(|i| matcher.matches_effect_of(i));
        debug!(term, remaining = candidates.len(), "narrowed search");
        if candidates.is_empty() {
            return Err(term);
        }
    }
    Ok(candidates)
}

/// Result of a smart-search step.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<'r> {
    /// Ingredients carrying every term so far, in registry order.
    Found(Vec<&'r Ingredient>),
    /// Applying `term` left nothing.
    Exhausted { term: String },
}

impl<'r> SearchOutcome<'r> {
    /// The matches, or an empty slice when the search ran dry.
    #[must_use]
    pub fn ingredients(&self) -> &[&'r Ingredient] {
        match self {
            SearchOutcome::Found(found) => found,
            SearchOutcome::Exhausted { .. } => &[],
        }
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, SearchOutcome::Exhausted { .. })
    }
}

impl fmt::Display for SearchOutcome<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchOutcome::Found(found) => {
                for (i, ingredient) in found.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{ingredient}")?;
                }
                Ok(())
            }
            SearchOutcome::Exhausted { term } => {
                write!(f, "no results after applying filter for '{term}'")
            }
        }
    }
}

/// A multi-term effect search that remembers its last result so it can be
/// narrowed further.
///
/// Each caller owns its own session; the borrowed [`Registry`] stays shared.
///
/// ```
/// use alembic::{ParserConfig, Registry};
///
/// let registry = Registry::from_text(
///     "Wheat { Restore Health { magnitude = 1; duration = 0 }\n Fortify Health { magnitude = 4; duration = 60 } }\n\
///      Blisterwort { Restore Health { magnitude = 1; duration = 0 } }",
///     &ParserConfig::default(),
/// )
/// .unwrap();
/// let mut session = registry.smart_search(false);
/// assert_eq!(session.search(&["restore"]).ingredients().len(), 2);
/// assert_eq!(session.refine("fortify").ingredients().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SmartSearch<'r> {
    registry: &'r Registry,
    exact: bool,
    last: Option<Vec<&'r Ingredient>>,
    /// The term that emptied the last result, while it stays empty.
    exhausted_by: Option<String>,
}

impl<'r> SmartSearch<'r> {
    #[must_use]
    pub fn new(registry: &'r Registry, exact: bool) -> Self {
        Self {
            registry,
            exact,
            last: None,
            exhausted_by: None,
        }
    }

    /// Find ingredients carrying every one of `terms`, replacing the
    /// remembered result. An empty term list finds nothing.
    pub fn search(&mut self, terms: &[impl AsRef<str>]) -> SearchOutcome<'r> {
        let Some((first, rest)) = terms.split_first() else {
            self.last = Some(Vec::new());
            self.exhausted_by = None;
            return SearchOutcome::Found(Vec::new());
        };
        let seed = find_by_effect(self.registry, first.as_ref(), self.exact);
        debug!(term = first.as_ref(), remaining = seed.len(), "seeded search");
        if seed.is_empty() {
            return self.exhaust(first.as_ref());
        }
        self.finish(narrow(seed, rest, self.exact))
    }

    /// Narrow the remembered result by one more term. Without a previous
    /// result this is a single-term [`search`](Self::search). Once a term has
    /// emptied the result, refining keeps reporting that term.
    pub fn refine(&mut self, term: &str) -> SearchOutcome<'r> {
        if let Some(exhausted_by) = &self.exhausted_by {
            return SearchOutcome::Exhausted {
                term: exhausted_by.clone(),
            };
        }
        match self.last.take() {
            Some(previous) => self.finish(narrow(previous, &[term], self.exact)),
            None => self.search(&[term]),
        }
    }

    /// The remembered result of the last step, if any.
    #[must_use]
    pub fn last(&self) -> Option<&[&'r Ingredient]> {
        self.last.as_deref()
    }

    pub fn clear(&mut self) {
        self.last = None;
        self.exhausted_by = None;
    }

    fn finish(&mut self, narrowed: Result<Vec<&'r Ingredient>, &str>) -> SearchOutcome<'r> {
        match narrowed {
            Ok(found) => {
                self.last = Some(found.clone());
                self.exhausted_by = None;
                SearchOutcome::Found(found)
            }
            Err(term) => self.exhaust(term),
        }
    }

    fn exhaust(&mut self, term: &str) -> SearchOutcome<'r> {
        self.last = Some(Vec::new());
        self.exhausted_by = Some(term.to_owned());
        SearchOutcome::Exhausted {
            term: term.to_owned(),
        }
    }
}

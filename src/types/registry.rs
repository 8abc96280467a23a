use std::collections::HashMap;
use std::fmt;

use tracing::warn;

use super::element::Element;
use super::error::{BuildError, LoadError};
use super::ingredient::{Ingredient, MAX_INGREDIENTS, MIN_INGREDIENTS};
use super::potion::Potion;
use crate::config::AlchemySettings;
use crate::parse::{self, ParserConfig};
use crate::search::{RankBy, SearchTarget, SmartSearch};

/// An ordered collection of uniquely named ingredients.
///
/// Built once from parsed registry text and read-only afterwards; safe to
/// share between threads behind `Arc`.
///
/// # Example
///
/// ```
/// use alembic::{ParserConfig, Registry};
///
/// let registry = Registry::from_text(
///     "Wheat { Restore Health { magnitude = 1; duration = 0 } }",
///     &ParserConfig::default(),
/// )
/// .unwrap();
/// assert_eq!(registry.find_by_effect("restore", false).len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Registry {
    pub(crate) ingredients: Vec<Ingredient>,
    /// Lowercased name -> position in `ingredients`.
    pub(crate) index: HashMap<String, usize>,
    pub(crate) duplicates: Vec<String>,
    pub(crate) rejected: Vec<LoadError>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect ingredients into a registry. Later ingredients whose name
    /// repeats an earlier one (ignoring case) are skipped.
    #[must_use]
    pub fn from_ingredients(ingredients: impl IntoIterator<Item = Ingredient>) -> Self {
        let mut registry = Self::new();
        for ingredient in ingredients {
            registry.insert(ingredient);
        }
        registry
    }

    /// Add an ingredient unless one with the same name is already present.
    /// Returns whether it was added.
    pub(crate) fn insert(&mut self, ingredient: Ingredient) -> bool {
        let key = ingredient.name.to_lowercase();
        if self.index.contains_key(&key) {
            warn!(ingredient = %ingredient.name, "skipping duplicate ingredient");
            self.duplicates.push(ingredient.name);
            return false;
        }
        self.index.insert(key, self.ingredients.len());
        self.ingredients.push(ingredient);
        true
    }

    /// Decode parsed elements into a registry.
    ///
    /// An ingredient whose `magnitude` or `duration` is not a usable number
    /// is skipped and listed by [`rejected`](Self::rejected); the rest of the
    /// registry still loads.
    ///
    /// # Errors
    ///
    /// Returns the first structural [`LoadError`]: a top-level element that
    /// is not an ingredient section, or an effect missing a required field.
    pub fn load(elements: &[Element]) -> Result<Self, LoadError> {
        crate::load::load(elements)
    }

    /// Decode parsed elements, skipping every malformed record instead of
    /// failing. The skipped records are listed by [`rejected`](Self::rejected).
    #[must_use]
    pub fn load_lenient(elements: &[Element]) -> Self {
        crate::load::load_lenient(elements)
    }

    /// Parse registry text and load it.
    ///
    /// # Errors
    ///
    /// Returns [`AlchemyError`](crate::AlchemyError) on parse or load failure.
    pub fn from_text(text: &str, config: &ParserConfig) -> Result<Self, crate::AlchemyError> {
        let elements = parse::parse(text, config)?;
        Ok(Self::load(&elements)?)
    }

    /// Read registry text from a stream and load it.
    ///
    /// # Errors
    ///
    /// Returns [`AlchemyError`](crate::AlchemyError) on read, parse, or load failure.
    pub fn from_reader(
        reader: impl std::io::Read,
        config: &ParserConfig,
    ) -> Result<Self, crate::AlchemyError> {
        let elements = parse::parse_reader(reader, config)?;
        Ok(Self::load(&elements)?)
    }

    /// Read a registry file and load it.
    ///
    /// # Errors
    ///
    /// Returns [`AlchemyError`](crate::AlchemyError) on I/O, parse, or load failure.
    pub fn from_file(
        path: impl AsRef<std::path::Path>,
        config: &ParserConfig,
    ) -> Result<Self, crate::AlchemyError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file), config)
    }

    /// Look up an ingredient by exact name, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Ingredient> {
        self.index
            .get(&name.to_lowercase())
            .map(|&idx| &self.ingredients[idx])
    }

    /// All ingredients in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    /// Names of ingredients skipped because an earlier one had the same name.
    #[must_use]
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    /// Records skipped while loading, in document order.
    #[must_use]
    pub fn rejected(&self) -> &[LoadError] {
        &self.rejected
    }

    /// Ingredients whose name matches `term`, ignoring case. Substring match
    /// unless `exact`.
    #[must_use]
    pub fn find_by_name(&self, term: &str, exact: bool) -> Vec<&Ingredient> {
        crate::search::find_by_name(self, term, exact)
    }

    /// Ingredients carrying at least one effect whose name matches `term`.
    #[must_use]
    pub fn find_by_effect(&self, term: &str, exact: bool) -> Vec<&Ingredient> {
        crate::search::find_by_effect(self, term, exact)
    }

    /// Ingredients that have a matching effect for every one of `terms`.
    #[must_use]
    pub fn find_all_effects(&self, terms: &[impl AsRef<str>], exact: bool) -> Vec<&Ingredient> {
        crate::search::find_all_effects(self, terms, exact)
    }

    /// Ingredients matching any one of `terms`, deduplicated, in registry order.
    #[must_use]
    pub fn find_any(
        &self,
        terms: &[impl AsRef<str>],
        exact: bool,
        target: SearchTarget,
    ) -> Vec<&Ingredient> {
        crate::search::find_any(self, terms, exact, target)
    }

    /// The exact name match for `term`, or else the first substring match.
    #[must_use]
    pub fn find_best_fit(&self, term: &str) -> Option<&Ingredient> {
        crate::search::find_best_fit(self, term)
    }

    /// The ingredient whose `effect` ranks highest under `rank_by`, skipping
    /// any named in `excluded`.
    #[must_use]
    pub fn find_best_by_effect(
        &self,
        effect: &str,
        rank_by: RankBy,
        excluded: &[impl AsRef<str>],
    ) -> Option<&Ingredient> {
        crate::search::find_best_by_effect(self, effect, rank_by, excluded)
    }

    /// Start a smart-search session over this registry.
    #[must_use]
    pub fn smart_search(&self, exact: bool) -> SmartSearch<'_> {
        SmartSearch::new(self, exact)
    }

    /// Resolve 2 to 4 ingredient names with [`find_best_fit`](Self::find_best_fit)
    /// and brew them.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the name count is out of range, a name
    /// matches nothing, or the ingredients share no effects.
    pub fn brew(
        &self,
        names: &[impl AsRef<str>],
        settings: &AlchemySettings,
    ) -> Result<Potion, BuildError> {
        if names.len() < MIN_INGREDIENTS {
            return Err(BuildError::InsufficientIngredients { count: names.len() });
        }
        if names.len() > MAX_INGREDIENTS {
            return Err(BuildError::TooManyIngredients { count: names.len() });
        }
        let ingredients = names
            .iter()
            .map(|name| {
                self.find_best_fit(name.as_ref())
                    .ok_or_else(|| BuildError::UnknownIngredient {
                        name: name.as_ref().to_owned(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        crate::brew::build(&ingredients, settings)
    }

    /// Render every ingredient as a registry section.
    #[must_use]
    pub fn to_elements(&self) -> Vec<Element> {
        self.ingredients.iter().map(Ingredient::to_element).collect()
    }

    /// Render the registry back into its text format.
    #[must_use]
    pub fn to_text(&self) -> String {
        parse::serialize(&self.to_elements())
    }
}

#[cfg(feature = "binary-cache")]
impl Registry {
    /// Serialize this registry to a byte vector.
    ///
    /// The optional `source_text` is hashed (BLAKE3) and embedded in the
    /// payload metadata so a stale cache can be detected later with
    /// [`cache_matches_source`](Self::cache_matches_source).
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::serial::SerializeError) if encoding fails.
    pub fn to_bytes(
        &self,
        source_text: Option<&str>,
    ) -> Result<Vec<u8>, crate::serial::SerializeError> {
        crate::serial::encode(self, source_text)
    }

    /// Deserialize a registry previously produced by [`to_bytes`](Self::to_bytes).
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::serial::DeserializeError) on
    /// format, integrity, or validation failure.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::serial::DeserializeError> {
        crate::serial::decode(bytes)
    }

    /// Whether a cached blob was built from exactly `source_text`.
    #[must_use]
    pub fn cache_matches_source(bytes: &[u8], source_text: &str) -> bool {
        crate::serial::source_digest(bytes)
            .is_some_and(|digest| digest == *blake3::hash(source_text.as_bytes()).as_bytes())
    }

    /// Serialize this registry and write it to a file.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::serial::SerializeError) on
    /// encoding or I/O failure.
    pub fn to_binary_file(
        &self,
        path: impl AsRef<std::path::Path>,
        source_text: Option<&str>,
    ) -> Result<(), crate::serial::SerializeError> {
        let bytes = self.to_bytes(source_text)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Read a file and deserialize the registry it contains.
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::serial::DeserializeError) on
    /// I/O, format, integrity, or validation failure.
    pub fn from_binary_file(
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, crate::serial::DeserializeError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Registry({} ingredients", self.ingredients.len())?;
        if !self.duplicates.is_empty() {
            write!(f, ", {} duplicates skipped", self.duplicates.len())?;
        }
        if !self.rejected.is_empty() {
            write!(f, ", {} rejected", self.rejected.len())?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Effect;

    fn wheat() -> Ingredient {
        Ingredient::new("Wheat", [Effect::new("Restore Health", 1.0, 0)])
    }

    #[test]
    fn first_occurrence_wins() {
        let registry = Registry::from_ingredients([
            wheat(),
            Ingredient::new("WHEAT", [Effect::new("Damage Health", 5.0, 0)]),
            Ingredient::new("Salt Pile", [Effect::new("Restore Magicka", 1.0, 0)]),
        ]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.duplicates(), ["WHEAT"]);
        let found = registry.get("wheat").unwrap();
        assert!(found.effect("Restore Health").is_some());
        assert_eq!(registry.to_string(), "Registry(2 ingredients, 1 duplicates skipped)");
    }

    #[test]
    fn iteration_preserves_order() {
        let registry = Registry::from_ingredients([
            Ingredient::new("B", []),
            Ingredient::new("A", []),
        ]);
        let names: Vec<&str> = registry.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
        assert!(!registry.is_empty());
        assert!(Registry::new().is_empty());
    }

    #[test]
    fn text_round_trip() {
        let registry = Registry::from_ingredients([
            wheat(),
            Ingredient::new(
                "Nightshade",
                [
                    Effect::new("Damage Health", 2.0, 0),
                    Effect::new("Fortify Destruction", 4.0, 60),
                ],
            ),
        ]);
        let reloaded = Registry::from_text(&registry.to_text(), &ParserConfig::default()).unwrap();
        assert_eq!(reloaded.ingredients, registry.ingredients);
    }

    #[test]
    fn from_text_keeps_records_around_a_bad_number() {
        let text = "Good { E { magnitude = 1; duration = 0 } }\nBad { E { magnitude = lots; duration = 0 } }";
        let registry = Registry::from_text(text, &ParserConfig::default()).unwrap();
        assert!(registry.get("good").is_some());
        assert!(registry.get("bad").is_none());
        assert_eq!(registry.rejected().len(), 1);
        assert_eq!(registry.rejected()[0].record(), "Bad");
        assert_eq!(registry.to_string(), "Registry(1 ingredients, 1 rejected)");
    }

    #[test]
    fn non_ascii_names_fold_the_same_everywhere() {
        let text = "Ælfroot { Fortify Éclat { MAGNITUDE = 2; Duration = 5 } }";
        let registry = Registry::from_text(text, &ParserConfig::default()).unwrap();
        let root = registry.get("ÆLFROOT").unwrap();
        assert!(root.name_matches("ælfroot"));
        assert_eq!(root.effect("FORTIFY ÉCLAT").unwrap().duration, 5);
        assert_eq!(registry.find_by_name("ælf", false).len(), 1);
        assert_eq!(registry.find_by_effect("fortify éclat", true).len(), 1);

        let element = root.to_element();
        assert!(element.child("fortify éclat").unwrap().is_some());
    }

    #[test]
    fn brew_checks_count_before_resolving_names() {
        let registry = Registry::from_ingredients([wheat()]);
        let settings = AlchemySettings::default();
        let err = registry.brew(&["nope"], &settings).unwrap_err();
        assert_eq!(err, BuildError::InsufficientIngredients { count: 1 });
        let err = registry
            .brew(&["a", "b", "c", "d", "e"], &settings)
            .unwrap_err();
        assert_eq!(err, BuildError::TooManyIngredients { count: 5 });
    }

    #[test]
    fn brew_reports_unknown_names() {
        let registry = Registry::from_ingredients([wheat()]);
        let err = registry
            .brew(&["wheat", "unicorn horn"], &AlchemySettings::default())
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::UnknownIngredient {
                name: "unicorn horn".into()
            }
        );
    }
}

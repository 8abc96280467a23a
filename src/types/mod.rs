mod effect;
mod element;
mod error;
mod ingredient;
mod keyword;
mod perk;
mod potion;
mod registry;
mod value;

pub use effect::Effect;
pub use element::{Element, ElementKind};
pub use error::{BuildError, ElementTypeMismatch, LoadError};
pub use ingredient::{Ingredient, EFFECT_SLOTS, MAX_INGREDIENTS, MIN_INGREDIENTS};
pub use keyword::{Disposition, Keyword, KeywordSet, BENEFICIAL, DURATION_BASED, HARMFUL};
pub use perk::{Perk, PerkKind, PerkPipeline};
pub use potion::Potion;
pub use registry::Registry;
pub use value::Value;

/// Case-insensitive name equality using the same Unicode lowercasing as the
/// registry index and search keys.
pub(crate) fn names_match(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

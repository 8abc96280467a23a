//! Alchemy reference and calculator.
//!
//! Registry text is parsed into an [`Element`] tree, decoded into a
//! [`Registry`] of [`Ingredient`]s, searched, and brewed into [`Potion`]s:
//!
//! ```
//! use alembic::{AlchemySettings, ParserConfig, Registry};
//!
//! let text = "
//! Blue Mountain Flower
//! {
//!     Restore Health { magnitude = 2; duration = 0 }
//! }
//! Wheat
//! {
//!     Restore Health { magnitude = 1; duration = 0 }
//! }
//! ";
//! let registry = Registry::from_text(text, &ParserConfig::default()).unwrap();
//! let potion = registry
//!     .brew(&["blue mountain", "wheat"], &AlchemySettings::default())
//!     .unwrap();
//! assert_eq!(potion.name(), "Potion of Restore Health");
//! ```

mod brew;
mod config;
mod error;
mod load;
pub mod parse;
mod search;
#[cfg(feature = "binary-cache")]
pub mod serial;
mod types;

pub use brew::{build, combine, common_effects};
pub use config::{AlchemySettings, FormulaSettings, PerkFactors, PerkSettings};
pub use error::AlchemyError;
pub use parse::{parse, parse_reader, serialize, serialize_with, ParseError, ParserConfig};
pub use search::{RankBy, SearchOutcome, SearchTarget, SmartSearch};
pub use types::{
    BuildError, Disposition, Effect, Element, ElementKind, ElementTypeMismatch, Ingredient,
    Keyword, KeywordSet, LoadError, Perk, PerkKind, PerkPipeline, Potion, Registry, Value,
    BENEFICIAL, DURATION_BASED, EFFECT_SLOTS, HARMFUL, MAX_INGREDIENTS, MIN_INGREDIENTS,
};
#[cfg(feature = "binary-cache")]
pub use serial::{DeserializeError, SerializeError};

//! Settings consumed by the parser and the brewing engine.
//!
//! Everything has a default, so an empty TOML document is a valid settings
//! file. Sections map one-to-one onto [`ParserConfig`], [`FormulaSettings`]
//! and [`PerkSettings`]:
//!
//! ```toml
//! [parser]
//! fuzzy_brackets = true
//!
//! [formula]
//! av_skill = 100
//!
//! [perks]
//! alchemist_rank = 5
//! benefactor = true
//!
//! [perks.factors]
//! benefactor = 1.25
//! ```

use serde::Deserialize;

use crate::parse::ParserConfig;

/// Top-level settings document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AlchemySettings {
    pub parser: ParserConfig,
    pub formula: FormulaSettings,
    pub perks: PerkSettings,
}

impl AlchemySettings {
    /// Parse settings from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns the TOML deserialization error if the document is invalid.
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    /// Read and parse a TOML settings file.
    ///
    /// # Errors
    ///
    /// Returns [`AlchemyError`](crate::AlchemyError) on I/O or TOML failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::AlchemyError> {
        let input = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&input)?)
    }
}

/// Game-setting inputs of the magnitude/duration formula.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormulaSettings {
    pub init_mult: f64,
    pub skill_factor: f64,
    pub av_skill: f64,
    /// Flat bonus added to `av_skill` before use.
    pub av_bonus: f64,
    pub extra_mod_percent: f64,
}

impl Default for FormulaSettings {
    fn default() -> Self {
        Self {
            init_mult: 4.0,
            skill_factor: 1.5,
            av_skill: 15.0,
            av_bonus: 0.0,
            extra_mod_percent: 0.0,
        }
    }
}

impl FormulaSettings {
    /// Skill level the formula actually uses.
    #[must_use]
    pub fn effective_skill(&self) -> f64 {
        self.av_skill + self.av_bonus
    }

    /// Scale `base` by the skill formula, rounding half away from zero.
    #[must_use]
    pub fn calculate(&self, base: f64) -> f64 {
        let av = self.effective_skill();
        (base
            * self.init_mult
            * (1.0 + av / 200.0)
            * (1.0 + (self.skill_factor - 1.0))
            * (av / 100.0)
            * (1.0 + self.extra_mod_percent / 100.0))
            .round()
    }
}

/// Which perks are active.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PerkSettings {
    /// 0 disables the perk.
    pub alchemist_rank: u8,
    pub advanced_lab: bool,
    pub benefactor: bool,
    pub poisoner: bool,
    pub resilience: bool,
    pub pure_mixture: bool,
    pub factors: PerkFactors,
}

/// Multipliers used by the perk pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PerkFactors {
    /// Added per alchemist rank.
    pub alchemist_step: f64,
    pub advanced_lab: f64,
    pub benefactor: f64,
    /// Bonus at skill 100; scales linearly with skill.
    pub poisoner: f64,
    pub resilience: f64,
}

impl Default for PerkFactors {
    fn default() -> Self {
        Self {
            alchemist_step: 0.2,
            advanced_lab: 1.25,
            benefactor: 1.25,
            poisoner: 0.25,
            resilience: 1.1,
        }
    }
}

use std::fmt;

use tracing::trace;

use super::effect::Effect;
use crate::config::PerkSettings;

/// The modifiers that can scale a brewed effect, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerkKind {
    /// Flat bonus per rank.
    Alchemist,
    /// Flat bonus for brewing at an advanced laboratory.
    AdvancedLab,
    /// Bonus to effects with a beneficial keyword.
    Benefactor,
    /// Skill-proportional bonus to purely harmful effects.
    Poisoner,
    /// Flat bonus applied last.
    Resilience,
}

impl PerkKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            PerkKind::Alchemist => "Alchemist",
            PerkKind::AdvancedLab => "Advanced Lab",
            PerkKind::Benefactor => "Benefactor",
            PerkKind::Poisoner => "Poisoner",
            PerkKind::Resilience => "Resilience",
        }
    }
}

impl fmt::Display for PerkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One step of the perk pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Perk {
    kind: PerkKind,
    enabled: bool,
    factor: f64,
}

impl Perk {
    #[must_use]
    pub fn new(kind: PerkKind, enabled: bool, factor: f64) -> Self {
        Self {
            kind,
            enabled,
            factor,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PerkKind {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// The multiplier this perk contributes for `effect` at skill level `skill`,
    /// or `None` when it does not apply.
    #[must_use]
    pub fn multiplier(&self, effect: &Effect, skill: f64) -> Option<f64> {
        if !self.enabled {
            return None;
        }
        match self.kind {
            PerkKind::Alchemist | PerkKind::AdvancedLab | PerkKind::Resilience => {
                Some(self.factor)
            }
            PerkKind::Benefactor => effect.is_beneficial().then_some(self.factor),
            PerkKind::Poisoner => (effect.is_harmful() && !effect.is_beneficial())
                .then(|| 1.0 + self.factor * skill / 100.0),
        }
    }
}

/// The fixed, ordered sequence of perks applied to every brewed effect,
/// plus the pure-mixture toggle that filters the finished potion.
#[derive(Debug, Clone, PartialEq)]
pub struct PerkPipeline {
    steps: [Perk; 5],
    pure_mixture: bool,
}

impl PerkPipeline {
    #[must_use]
    pub fn from_settings(settings: &PerkSettings) -> Self {
        let factors = &settings.factors;
        let rank = f64::from(settings.alchemist_rank);
        Self {
            steps: [
                Perk::new(
                    PerkKind::Alchemist,
                    settings.alchemist_rank > 0,
                    1.0 + factors.alchemist_step * rank,
                ),
                Perk::new(PerkKind::AdvancedLab, settings.advanced_lab, factors.advanced_lab),
                Perk::new(PerkKind::Benefactor, settings.benefactor, factors.benefactor),
                Perk::new(PerkKind::Poisoner, settings.poisoner, factors.poisoner),
                Perk::new(PerkKind::Resilience, settings.resilience, factors.resilience),
            ],
            pure_mixture: settings.pure_mixture,
        }
    }

    /// Run `value` through every step in order. Disabled steps are visited
    /// and skipped.
    #[must_use]
    pub fn apply(&self, effect: &Effect, value: f64, skill: f64) -> f64 {
        self.steps.iter().fold(value, |acc, perk| match perk.multiplier(effect, skill) {
            Some(m) => {
                trace!(perk = perk.name(), effect = %effect.name, multiplier = m, "perk applied");
                acc * m
            }
            None => acc,
        })
    }

    #[must_use]
    pub fn steps(&self) -> &[Perk] {
        &self.steps
    }

    #[must_use]
    pub fn pure_mixture(&self) -> bool {
        self.pure_mixture
    }
}

impl Default for PerkPipeline {
    fn default() -> Self {
        Self::from_settings(&PerkSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::keyword::{Keyword, BENEFICIAL, HARMFUL};

    fn all_enabled(rank: u8) -> PerkSettings {
        PerkSettings {
            alchemist_rank: rank,
            advanced_lab: true,
            benefactor: true,
            poisoner: true,
            resilience: true,
            pure_mixture: false,
            ..PerkSettings::default()
        }
    }

    #[test]
    fn steps_are_in_fixed_order() {
        let pipeline = PerkPipeline::from_settings(&PerkSettings::default());
        let kinds: Vec<PerkKind> = pipeline.steps().iter().map(Perk::kind).collect();
        assert_eq!(
            kinds,
            [
                PerkKind::Alchemist,
                PerkKind::AdvancedLab,
                PerkKind::Benefactor,
                PerkKind::Poisoner,
                PerkKind::Resilience,
            ]
        );
    }

    #[test]
    fn defaults_are_no_ops() {
        let pipeline = PerkPipeline::default();
        let effect = Effect::new("Restore Health", 10.0, 0);
        assert_eq!(pipeline.apply(&effect, 10.0, 50.0), 10.0);
        assert!(pipeline.steps().iter().all(|p| !p.enabled()));
    }

    #[test]
    fn alchemist_rank_multiplier() {
        let effect = Effect::new("Restore Health", 10.0, 0);
        for (rank, expected) in [(0_u8, 10.0), (1, 12.0), (2, 14.0)] {
            let settings = PerkSettings {
                alchemist_rank: rank,
                ..PerkSettings::default()
            };
            let got = PerkPipeline::from_settings(&settings).apply(&effect, 10.0, 0.0);
            assert!((got - expected).abs() < 1e-9, "rank {rank}: {got}");
        }
    }

    #[test]
    fn benefactor_only_for_beneficial() {
        let perk = Perk::new(PerkKind::Benefactor, true, 1.25);
        let good = Effect::new("Restore Health", 1.0, 0).with_keyword(Keyword::new(BENEFICIAL, ""));
        let bad = Effect::new("Damage Health", 1.0, 0).with_keyword(Keyword::new(HARMFUL, ""));
        assert_eq!(perk.multiplier(&good, 0.0), Some(1.25));
        assert_eq!(perk.multiplier(&bad, 0.0), None);
    }

    #[test]
    fn poisoner_scales_with_skill_and_skips_mixed_effects() {
        let perk = Perk::new(PerkKind::Poisoner, true, 0.25);
        let bad = Effect::new("Damage Health", 1.0, 0).with_keyword(Keyword::new(HARMFUL, ""));
        let mixed = bad.clone().with_keyword(Keyword::new(BENEFICIAL, ""));
        assert_eq!(perk.multiplier(&bad, 100.0), Some(1.25));
        assert_eq!(perk.multiplier(&bad, 40.0), Some(1.1));
        assert_eq!(perk.multiplier(&mixed, 100.0), None);
    }

    #[test]
    fn disabled_perk_contributes_nothing() {
        let perk = Perk::new(PerkKind::AdvancedLab, false, 1.25);
        assert_eq!(perk.multiplier(&Effect::new("X", 1.0, 0), 100.0), None);
    }

    #[test]
    fn full_pipeline_on_beneficial_effect() {
        let pipeline = PerkPipeline::from_settings(&all_enabled(2));
        let effect = Effect::new("Restore Health", 1.0, 0).with_keyword(Keyword::new(BENEFICIAL, ""));
        // 1.4 * 1.25 * 1.25 * 1.1
        let got = pipeline.apply(&effect, 10.0, 100.0);
        assert!((got - 10.0 * 1.4 * 1.25 * 1.25 * 1.1).abs() < 1e-9);
    }

    #[test]
    fn full_pipeline_on_harmful_effect() {
        let pipeline = PerkPipeline::from_settings(&all_enabled(1));
        let effect = Effect::new("Damage Health", 1.0, 0).with_keyword(Keyword::new(HARMFUL, ""));
        // 1.2 * 1.25 * (1 + 0.25) * 1.1
        let got = pipeline.apply(&effect, 10.0, 100.0);
        assert!((got - 10.0 * 1.2 * 1.25 * 1.25 * 1.1).abs() < 1e-9);
    }
}

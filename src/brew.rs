use std::collections::HashMap;

use tracing::debug;

use crate::config::AlchemySettings;
use crate::types::{
    BuildError, Disposition, Effect, Ingredient, PerkPipeline, Potion, MAX_INGREDIENTS,
    MIN_INGREDIENTS,
};

/// An effect seen on exactly one ingredient so far, or already shared.
enum Occurrence {
    Single { owner: usize, effect: Effect },
    Common(usize),
}

fn check_count(count: usize) -> Result<(), BuildError> {
    if count < MIN_INGREDIENTS {
        return Err(BuildError::InsufficientIngredients { count });
    }
    if count > MAX_INGREDIENTS {
        return Err(BuildError::TooManyIngredients { count });
    }
    Ok(())
}

/// Effects shared by at least two of `ingredients`, in the order they first
/// became shared.
///
/// Magnitude and duration are each the maximum over every occurrence, and
/// keywords are the union. An effect repeated on a single ingredient does not
/// count as shared, but its values still take part in the maximum.
///
/// # Errors
///
/// Returns [`BuildError::InsufficientIngredients`] or
/// [`BuildError::TooManyIngredients`] when not given 2 to 4 ingredients.
pub fn common_effects(ingredients: &[&Ingredient]) -> Result<Vec<Effect>, BuildError> {
    check_count(ingredients.len())?;

    let mut seen: HashMap<String, Occurrence> = HashMap::new();
    let mut common: Vec<Effect> = Vec::new();

    for (owner, ingredient) in ingredients.iter().enumerate() {
        for effect in ingredient.effects() {
            let key = effect.name.to_lowercase();
            match seen.get_mut(&key) {
                None => {
                    seen.insert(
                        key,
                        Occurrence::Single {
                            owner,
                            effect: effect.clone(),
                        },
                    );
                }
                Some(occurrence) => match occurrence {
                    Occurrence::Common(idx) => merge(&mut common[*idx], effect),
                    Occurrence::Single {
                        owner: first,
                        effect: stored,
                    } if *first == owner => merge(stored, effect),
                    Occurrence::Single { effect: first, .. } => {
                        let first = std::mem::take(first);
                        common.push(promote(first, effect));
                        *occurrence = Occurrence::Common(common.len() - 1);
                    }
                },
            }
        }
    }

    Ok(common)
}

/// The occurrence with the larger magnitude keeps its name; the first wins
/// a tie.
fn promote(first: Effect, second: &Effect) -> Effect {
    if second.magnitude > first.magnitude {
        let mut promoted = second.clone();
        merge(&mut promoted, &first);
        promoted
    } else {
        let mut promoted = first;
        merge(&mut promoted, second);
        promoted
    }
}

fn merge(into: &mut Effect, other: &Effect) {
    into.magnitude = into.magnitude.max(other.magnitude);
    into.duration = into.duration.max(other.duration);
    into.keywords.extend_from(&other.keywords);
}

/// The effect with the largest magnitude; the first wins a tie.
fn strongest(effects: &[Effect]) -> Option<&Effect> {
    effects.iter().fold(None, |best, effect| match best {
        Some(b) if effect.magnitude <= b.magnitude => Some(b),
        _ => Some(effect),
    })
}

fn potion_name(effects: &[Effect]) -> (String, bool) {
    let Some(strongest) = strongest(effects) else {
        return ("Potion".to_owned(), false);
    };
    let poison = strongest.is_harmful();
    let prefix = if poison {
        "Poison"
    } else if effects.len() > 2 {
        "Elixir"
    } else if effects.len() == 2 {
        "Draught"
    } else {
        "Potion"
    };
    (format!("{prefix} of {}", strongest.name), poison)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_duration(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else if value >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        value as u32
    }
}

fn apply_formula(effect: &mut Effect, settings: &AlchemySettings, perks: &PerkPipeline) {
    let skill = settings.formula.effective_skill();
    let base = settings.formula.calculate(effect.magnitude);
    let scaled = perks.apply(effect, base, skill).round();
    if effect.is_duration_based() {
        effect.duration = to_duration(scaled);
    } else {
        effect.magnitude = scaled;
    }
}

/// Keep only the side of the potion its strongest effect is on.
fn purify(effects: &mut Vec<Effect>, poison: bool) {
    let wanted = if poison {
        Disposition::Negative
    } else {
        Disposition::Positive
    };
    effects.retain(|e| e.keywords.has_disposition(wanted));
}

/// Brew `ingredients` into a potion. Ingredients with nothing in common
/// produce a potion named `"Potion"` with no effects.
///
/// # Errors
///
/// Returns [`BuildError::InsufficientIngredients`] or
/// [`BuildError::TooManyIngredients`] when not given 2 to 4 ingredients.
pub fn combine(ingredients: &[&Ingredient], settings: &AlchemySettings) -> Result<Potion, BuildError> {
    let effects = common_effects(ingredients)?;
    Ok(brew(effects, ingredients.len(), settings))
}

/// Like [`combine`], but at least one shared effect is required.
///
/// The check is made on the shared effects themselves, so a potion whose
/// effects are all dropped by the pure mixture filter still brews.
///
/// # Errors
///
/// Returns [`BuildError::BuildFailed`] when the ingredients share no effects,
/// plus the count errors of [`combine`].
pub fn build(ingredients: &[&Ingredient], settings: &AlchemySettings) -> Result<Potion, BuildError> {
    let effects = common_effects(ingredients)?;
    if effects.is_empty() {
        return Err(BuildError::BuildFailed);
    }
    Ok(brew(effects, ingredients.len(), settings))
}

fn brew(mut effects: Vec<Effect>, ingredients: usize, settings: &AlchemySettings) -> Potion {
    let (name, poison) = potion_name(&effects);

    let perks = PerkPipeline::from_settings(&settings.perks);
    for effect in &mut effects {
        apply_formula(effect, settings, &perks);
    }
    if perks.pure_mixture() {
        purify(&mut effects, poison);
    }

    debug!(
        potion = %name,
        ingredients,
        effects = effects.len(),
        "brewed potion"
    );
    Potion::new(name, effects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PerkSettings;
    use crate::types::{Keyword, BENEFICIAL, DURATION_BASED, HARMFUL};

    fn effect(name: &str, magnitude: f64, duration: u32) -> Effect {
        Effect::new(name, magnitude, duration)
    }

    fn harmful(name: &str, magnitude: f64) -> Effect {
        effect(name, magnitude, 0).with_keyword(Keyword::new(HARMFUL, "00042509"))
    }

    fn beneficial(name: &str, magnitude: f64) -> Effect {
        effect(name, magnitude, 0).with_keyword(Keyword::new(BENEFICIAL, "00042508"))
    }

    #[test]
    fn shared_effect_takes_max_of_each_field() {
        let a = Ingredient::new("A", [effect("Damage Stamina", 10.0, 0)]);
        let b = Ingredient::new("B", [effect("Damage Stamina", 20.0, 5)]);
        let common = common_effects(&[&a, &b]).unwrap();
        assert_eq!(common.len(), 1);
        assert_eq!(common[0].name, "Damage Stamina");
        assert_eq!(common[0].magnitude, 20.0);
        assert_eq!(common[0].duration, 5);
    }

    #[test]
    fn magnitude_and_duration_are_maximized_independently() {
        let a = Ingredient::new("A", [effect("Regenerate Health", 5.0, 300)]);
        let b = Ingredient::new("B", [effect("Regenerate Health", 8.0, 10)]);
        let c = Ingredient::new("C", [effect("Regenerate Health", 1.0, 600)]);
        let common = common_effects(&[&a, &b, &c]).unwrap();
        assert_eq!(common[0].magnitude, 8.0);
        assert_eq!(common[0].duration, 600);
    }

    #[test]
    fn unshared_effects_are_dropped() {
        let a = Ingredient::new("A", [effect("X", 1.0, 0), effect("Y", 1.0, 0)]);
        let b = Ingredient::new("B", [effect("X", 1.0, 0), effect("Z", 1.0, 0)]);
        let names: Vec<String> = common_effects(&[&a, &b])
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, ["X"]);
    }

    #[test]
    fn repeat_within_one_ingredient_is_not_shared() {
        let a = Ingredient::new("A", [effect("X", 1.0, 0), effect("X", 2.0, 0)]);
        let b = Ingredient::new("B", [effect("Y", 1.0, 0)]);
        assert!(common_effects(&[&a, &b]).unwrap().is_empty());
    }

    #[test]
    fn repeat_within_one_ingredient_still_counts_toward_the_maximum() {
        let a = Ingredient::new("A", [effect("X", 1.0, 0), effect("X", 5.0, 9)]);
        let b = Ingredient::new("B", [effect("X", 2.0, 3)]);
        let common = common_effects(&[&a, &b]).unwrap();
        assert_eq!(common.len(), 1);
        assert_eq!(common[0].magnitude, 5.0);
        assert_eq!(common[0].duration, 9);
    }

    #[test]
    fn names_match_ignoring_case() {
        let a = Ingredient::new("A", [effect("Fortify Health", 4.0, 60)]);
        let b = Ingredient::new("B", [effect("fortify health", 6.0, 30)]);
        let common = common_effects(&[&a, &b]).unwrap();
        assert_eq!(common.len(), 1);
        assert_eq!(common[0].name, "fortify health");
        assert_eq!(common[0].duration, 60);
    }

    #[test]
    fn count_is_checked() {
        let a = Ingredient::new("A", []);
        assert_eq!(
            common_effects(&[&a]).unwrap_err(),
            BuildError::InsufficientIngredients { count: 1 }
        );
        assert_eq!(
            common_effects(&[&a, &a, &a, &a, &a]).unwrap_err(),
            BuildError::TooManyIngredients { count: 5 }
        );
    }

    #[test]
    fn naming_follows_strongest_effect() {
        assert_eq!(potion_name(&[]).0, "Potion");
        assert_eq!(potion_name(&[effect("A", 1.0, 0)]).0, "Potion of A");
        assert_eq!(
            potion_name(&[effect("A", 1.0, 0), effect("B", 3.0, 0)]).0,
            "Draught of B"
        );
        assert_eq!(
            potion_name(&[effect("A", 1.0, 0), effect("B", 3.0, 0), effect("C", 3.0, 0)]).0,
            "Elixir of B"
        );
        let (name, poison) = potion_name(&[harmful("Damage Health", 5.0), beneficial("Restore Health", 1.0)]);
        assert_eq!(name, "Poison of Damage Health");
        assert!(poison);
    }

    #[test]
    fn combine_without_common_effects_is_plain_potion() {
        let a = Ingredient::new("A", [effect("X", 1.0, 0)]);
        let b = Ingredient::new("B", [effect("Y", 1.0, 0)]);
        let potion = combine(&[&a, &b], &AlchemySettings::default()).unwrap();
        assert_eq!(potion.name(), "Potion");
        assert!(potion.effects().is_empty());
        assert_eq!(
            build(&[&a, &b], &AlchemySettings::default()).unwrap_err(),
            BuildError::BuildFailed
        );
    }

    #[test]
    fn formula_scales_magnitude() {
        let a = Ingredient::new("A", [effect("Restore Health", 5.0, 0)]);
        let b = Ingredient::new("B", [effect("Restore Health", 5.0, 0)]);
        let mut settings = AlchemySettings::default();
        settings.formula.av_skill = 100.0;
        // 5 * 4 * 1.5 * 1.5 * 1.0 = 45
        let potion = build(&[&a, &b], &settings).unwrap();
        assert_eq!(potion.name(), "Potion of Restore Health");
        assert_eq!(potion.effects()[0].magnitude, 45.0);
        assert_eq!(potion.effects()[0].duration, 0);
    }

    #[test]
    fn duration_based_effects_scale_duration() {
        let slow = effect("Slow", 2.0, 5).with_keyword(Keyword::new(DURATION_BASED, "0010ab"));
        let a = Ingredient::new("A", [slow.clone()]);
        let b = Ingredient::new("B", [slow]);
        let mut settings = AlchemySettings::default();
        settings.formula.av_skill = 100.0;
        let potion = build(&[&a, &b], &settings).unwrap();
        assert_eq!(potion.effects()[0].magnitude, 2.0);
        assert_eq!(potion.effects()[0].duration, 18);
    }

    #[test]
    fn perks_scale_after_the_formula() {
        let a = Ingredient::new("A", [beneficial("Restore Health", 5.0)]);
        let b = Ingredient::new("B", [beneficial("Restore Health", 5.0)]);
        let mut settings = AlchemySettings::default();
        settings.formula.av_skill = 100.0;
        settings.perks = PerkSettings {
            alchemist_rank: 1,
            benefactor: true,
            poisoner: true,
            ..PerkSettings::default()
        };
        // 45 * 1.2 * 1.25, poisoner skipped for a beneficial effect
        let potion = build(&[&a, &b], &settings).unwrap();
        assert_eq!(potion.effects()[0].magnitude, 68.0);
    }

    #[test]
    fn pure_mixture_keeps_one_side() {
        let a = Ingredient::new(
            "A",
            [harmful("Damage Health", 10.0), beneficial("Restore Health", 1.0)],
        );
        let b = Ingredient::new(
            "B",
            [harmful("Damage Health", 10.0), beneficial("Restore Health", 1.0)],
        );
        let mut settings = AlchemySettings::default();
        let mixed = build(&[&a, &b], &settings).unwrap();
        assert_eq!(mixed.effects().len(), 2);

        settings.perks.pure_mixture = true;
        let pure = build(&[&a, &b], &settings).unwrap();
        assert_eq!(pure.name(), "Poison of Damage Health");
        assert!(pure.is_poison());
        let names: Vec<&str> = pure.effects().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Damage Health"]);
    }

    #[test]
    fn pure_mixture_filtering_everything_is_not_a_failed_build() {
        let a = Ingredient::new("A", [effect("Restore Health", 5.0, 0)]);
        let b = Ingredient::new("B", [effect("Restore Health", 5.0, 0)]);
        let mut settings = AlchemySettings::default();
        settings.perks.pure_mixture = true;
        assert_eq!(common_effects(&[&a, &b]).unwrap().len(), 1);
        let potion = build(&[&a, &b], &settings).unwrap();
        assert_eq!(potion.name(), "Potion of Restore Health");
        assert!(potion.effects().is_empty());
    }
}

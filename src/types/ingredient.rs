use std::fmt;

use super::effect::Effect;
use super::element::Element;

/// Number of effect slots on an ingredient.
pub const EFFECT_SLOTS: usize = 4;
/// Fewest ingredients a potion can be brewed from.
pub const MIN_INGREDIENTS: usize = 2;
/// Most ingredients a potion can be brewed from.
pub const MAX_INGREDIENTS: usize = 4;

/// A named record with up to four effects. Empty slots hold [`Effect::null`].
#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    pub name: String,
    pub effects: [Effect; EFFECT_SLOTS],
}

impl Ingredient {
    /// Build an ingredient from its effects. Effects past the fourth are dropped.
    #[must_use]
    pub fn new(name: impl Into<String>, effects: impl IntoIterator<Item = Effect>) -> Self {
        let mut slots: [Effect; EFFECT_SLOTS] = Default::default();
        for (slot, effect) in slots.iter_mut().zip(effects) {
            *slot = effect;
        }
        Self {
            name: name.into(),
            effects: slots,
        }
    }

    /// The non-null effects in slot order.
    pub fn effects(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter().filter(|e| !e.is_null())
    }

    /// Find a non-null effect by name (case-insensitive).
    #[must_use]
    pub fn effect(&self, name: &str) -> Option<&Effect> {
        self.effects().find(|e| e.name_matches(name))
    }

    #[must_use]
    pub fn name_matches(&self, name: &str) -> bool {
        super::names_match(&self.name, name)
    }

    /// Render this ingredient as a registry section.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let effects = self
            .effects()
            .map(|effect| {
                let mut children = vec![
                    Element::variable("magnitude", effect.magnitude.to_string()),
                    Element::variable("duration", effect.duration.to_string()),
                ];
                if !effect.keywords.is_empty() {
                    let keywords = effect
                        .keywords
                        .iter()
                        .map(|kw| Element::variable(kw.form_id(), kw.name()))
                        .collect();
                    children.push(Element::section("Keywords", keywords));
                }
                Element::section(effect.name.clone(), children)
            })
            .collect();
        Element::section(self.name.clone(), effects)
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for (i, effect) in self.effects().enumerate() {
            let sep = if i == 0 { ": " } else { ", " };
            write!(f, "{sep}{effect}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::keyword::{Keyword, HARMFUL};

    #[test]
    fn fewer_than_four_effects_pads_with_null() {
        let ing = Ingredient::new("Wheat", [Effect::new("Restore Health", 1.0, 0)]);
        assert_eq!(ing.effects().count(), 1);
        assert!(ing.effects[1].is_null());
        assert!(ing.effects[3].is_null());
    }

    #[test]
    fn extra_effects_are_dropped() {
        let effects = (0..6).map(|i| Effect::new(format!("E{i}"), 1.0, 0));
        let ing = Ingredient::new("Many", effects);
        let names: Vec<&str> = ing.effects().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["E0", "E1", "E2", "E3"]);
    }

    #[test]
    fn lookup_effect_case_insensitively() {
        let ing = Ingredient::new("Wheat", [Effect::new("Restore Health", 1.0, 0)]);
        assert!(ing.effect("restore health").is_some());
        assert!(ing.effect("").is_none());
        assert!(ing.name_matches("WHEAT"));
    }

    #[test]
    fn to_element_shape() {
        let ing = Ingredient::new(
            "Nightshade",
            [Effect::new("Damage Health", 2.0, 0).with_keyword(Keyword::new(HARMFUL, "00042509"))],
        );
        let el = ing.to_element();
        assert_eq!(el.name(), "Nightshade");
        let effect = &el.children().unwrap()[0];
        assert_eq!(effect.name(), "Damage Health");
        assert_eq!(effect.child("magnitude").unwrap().unwrap().value().unwrap(), "2");
        assert_eq!(effect.child("duration").unwrap().unwrap().value().unwrap(), "0");
        let keywords = effect.child("Keywords").unwrap().unwrap();
        let kw = &keywords.children().unwrap()[0];
        assert_eq!(kw.name(), "00042509");
        assert_eq!(kw.value().unwrap(), HARMFUL);
    }

    #[test]
    fn display() {
        let ing = Ingredient::new(
            "Wheat",
            [
                Effect::new("Restore Health", 1.0, 0),
                Effect::new("Fortify Health", 2.0, 60),
            ],
        );
        assert_eq!(
            ing.to_string(),
            "Wheat: Restore Health (1), Fortify Health (2 for 60s)"
        );
    }
}

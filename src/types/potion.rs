use std::fmt;

use super::effect::Effect;

/// The computed result of brewing two to four ingredients.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Potion {
    name: String,
    effects: Vec<Effect>,
}

impl Potion {
    pub(crate) fn new(name: String, effects: Vec<Effect>) -> Self {
        Self { name, effects }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Whether the potion was classified as a poison by its strongest effect.
    #[must_use]
    pub fn is_poison(&self) -> bool {
        self.name.starts_with("Poison ")
    }
}

impl fmt::Display for Potion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for effect in &self.effects {
            write!(f, "\n  {effect}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_and_display() {
        let p = Potion::new(
            "Poison of Damage Health".into(),
            vec![Effect::new("Damage Health", 12.0, 0)],
        );
        assert!(p.is_poison());
        assert_eq!(p.effects().len(), 1);
        assert_eq!(p.to_string(), "Poison of Damage Health\n  Damage Health (12)");
    }

    #[test]
    fn empty_potion() {
        let p = Potion::new("Potion".into(), Vec::new());
        assert!(!p.is_poison());
        assert_eq!(p.to_string(), "Potion");
    }
}

use tracing::{debug, warn};

use crate::types::{
    Effect, Element, Ingredient, Keyword, KeywordSet, LoadError, Registry, Value, EFFECT_SLOTS,
};

const MAGNITUDE: &str = "magnitude";
const DURATION: &str = "duration";
const KEYWORDS: &str = "keywords";

/// Structural errors abort; an ingredient with an unusable number is
/// skipped and kept in [`Registry::rejected`].
pub(crate) fn load(elements: &[Element]) -> Result<Registry, LoadError> {
    let mut registry = Registry::new();
    for element in elements {
        match decode_ingredient(element) {
            Ok(ingredient) => {
                registry.insert(ingredient);
            }
            Err(err) if err.is_structural() => return Err(err),
            Err(err) => reject(&mut registry, err),
        }
    }
    debug!(
        ingredients = registry.len(),
        duplicates = registry.duplicates().len(),
        rejected = registry.rejected().len(),
        "loaded registry"
    );
    Ok(registry)
}

pub(crate) fn load_lenient(elements: &[Element]) -> Registry {
    let mut registry = Registry::new();
    for element in elements {
        match decode_ingredient(element) {
            Ok(ingredient) => {
                registry.insert(ingredient);
            }
            Err(err) => reject(&mut registry, err),
        }
    }
    debug!(
        ingredients = registry.len(),
        rejected = registry.rejected().len(),
        "loaded registry leniently"
    );
    registry
}

fn reject(registry: &mut Registry, err: LoadError) {
    warn!(record = err.record(), error = %err, "skipping malformed record");
    registry.rejected.push(err);
}

fn decode_ingredient(element: &Element) -> Result<Ingredient, LoadError> {
    let record = element.name();
    let children = element.children().map_err(|source| LoadError::TypeMismatch {
        record: record.to_owned(),
        source,
    })?;
    if record.is_empty() {
        return Err(malformed(record, "ingredient has no name"));
    }

    let effects = children
        .iter()
        .take(EFFECT_SLOTS)
        .map(|child| decode_effect(record, child))
        .collect::<Result<Vec<_>, _>>()?;
    if children.len() > EFFECT_SLOTS {
        debug!(
            ingredient = record,
            ignored = children.len() - EFFECT_SLOTS,
            "ignoring effects past the last slot"
        );
    }

    Ok(Ingredient::new(record, effects))
}

fn decode_effect(record: &str, element: &Element) -> Result<Effect, LoadError> {
    let name = element.name();
    let mismatch = |source| LoadError::TypeMismatch {
        record: record.to_owned(),
        source,
    };
    element.children().map_err(mismatch)?;
    if name.is_empty() {
        return Err(malformed(record, "effect has no name"));
    }

    let magnitude = required_number(record, element, MAGNITUDE)?;
    let duration = required_number(record, element, DURATION)?;
    let duration = to_duration(duration).ok_or_else(|| LoadError::InvalidNumber {
        record: record.to_owned(),
        effect: name.to_owned(),
        field: DURATION.to_owned(),
        value: duration.to_string(),
    })?;

    let keywords = match element.child(KEYWORDS).map_err(mismatch)? {
        Some(section) => decode_keywords(record, section)?,
        None => KeywordSet::new(),
    };

    Ok(Effect {
        name: name.to_owned(),
        magnitude,
        duration,
        keywords,
    })
}

fn required_number(record: &str, effect: &Element, field: &str) -> Result<f64, LoadError> {
    let mismatch = |source| LoadError::TypeMismatch {
        record: record.to_owned(),
        source,
    };
    let child = effect.child(field).map_err(mismatch)?.ok_or_else(|| {
        malformed(
            record,
            format!("effect '{}' has no {field}", effect.name()),
        )
    })?;
    match child.typed_value().map_err(mismatch)? {
        Value::Number(n) => Ok(n),
        other => Err(LoadError::InvalidNumber {
            record: record.to_owned(),
            effect: effect.name().to_owned(),
            field: field.to_owned(),
            value: other.to_string(),
        }),
    }
}

fn decode_keywords(record: &str, section: &Element) -> Result<KeywordSet, LoadError> {
    let mismatch = |source| LoadError::TypeMismatch {
        record: record.to_owned(),
        source,
    };
    let mut keywords = KeywordSet::new();
    for entry in section.children().map_err(mismatch)? {
        let name = entry.value().map_err(mismatch)?;
        keywords.insert(Keyword::new(name, entry.name()));
    }
    Ok(keywords)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_duration(value: f64) -> Option<u32> {
    let valid = value.is_finite()
        && value >= 0.0
        && value.fract() == 0.0
        && value <= f64::from(u32::MAX);
    valid.then(|| value as u32)
}

fn malformed(record: &str, reason: impl Into<String>) -> LoadError {
    LoadError::MalformedRecord {
        record: record.to_owned(),
        reason: reason.into(),
    }
}

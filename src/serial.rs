//! Binary cache format for loaded registries.
//!
//! Parsing and loading a large registry text is cheap but not free; a
//! [`Registry`](crate::Registry) can be written out once and read back
//! without touching the text parser. The format is a 32-byte fixed header
//! followed by a bincode-encoded payload.
//!
//! ## Wire Format
//!
//! ```text
//! Offset  Size  Field
//! 0       4     Magic bytes: b"ALCH"
//! 4       2     Format version (u16, little-endian)
//! 6       2     Crate format revision (u16, little-endian, informational)
//! 8       4     Flags (u32, reserved)
//! 12      4     Payload length in bytes (u32, little-endian)
//! 16      16    BLAKE3 hash of the payload (truncated to 16 bytes)
//! 32..    var   Bincode-encoded payload
//! ```
//!
//! The payload may carry the BLAKE3 digest of the registry text it was built
//! from, so a caller can tell whether a cache file is stale.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Effect, Ingredient, Keyword, KeywordSet, Registry, EFFECT_SLOTS};

const MAGIC: &[u8; 4] = b"ALCH";
const FORMAT_VERSION: u16 = 1;
const REVISION: u16 = 1;
const HEADER_SIZE: usize = 32;

/// Errors that can occur when writing a [`Registry`](crate::Registry) to bytes.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("failed to encode registry: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("I/O error during serialization: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when reading a [`Registry`](crate::Registry) from bytes.
#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("not a registry cache: invalid magic bytes")]
    BadMagic,

    #[error("incompatible format version: blob is v{blob}, crate supports v{supported}")]
    IncompatibleVersion { blob: u16, supported: u16 },

    #[error("integrity check failed: BLAKE3 checksum mismatch")]
    ChecksumMismatch,

    #[error("payload length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: u32, actual: usize },

    #[error("failed to decode payload: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("I/O error during deserialization: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedRegistry {
    metadata: RegistryMetadata,
    ingredients: Vec<SerializedIngredient>,
    duplicates: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RegistryMetadata {
    ingredient_count: usize,
    effect_count: usize,
    source_digest: Option<[u8; 32]>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedIngredient {
    name: String,
    effects: Vec<SerializedEffect>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedEffect {
    name: String,
    magnitude: f64,
    duration: u32,
    keywords: Vec<SerializedKeyword>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedKeyword {
    name: String,
    form_id: String,
}

fn registry_to_serialized(registry: &Registry, source_text: Option<&str>) -> SerializedRegistry {
    let source_digest = source_text.map(|s| *blake3::hash(s.as_bytes()).as_bytes());

    let ingredients: Vec<SerializedIngredient> = registry
        .iter()
        .map(|ingredient| SerializedIngredient {
            name: ingredient.name.clone(),
            effects: ingredient.effects().map(serialize_effect).collect(),
        })
        .collect();

    SerializedRegistry {
        metadata: RegistryMetadata {
            ingredient_count: ingredients.len(),
            effect_count: ingredients.iter().map(|i| i.effects.len()).sum(),
            source_digest,
        },
        ingredients,
        duplicates: registry.duplicates().to_vec(),
    }
}

fn serialize_effect(effect: &Effect) -> SerializedEffect {
    SerializedEffect {
        name: effect.name.clone(),
        magnitude: effect.magnitude,
        duration: effect.duration,
        keywords: effect
            .keywords
            .iter()
            .map(|kw| SerializedKeyword {
                name: kw.name().to_owned(),
                form_id: kw.form_id().to_owned(),
            })
            .collect(),
    }
}

fn deserialize_effect(effect: SerializedEffect) -> Effect {
    let keywords: KeywordSet = effect
        .keywords
        .into_iter()
        .map(|kw| Keyword::new(kw.name, kw.form_id))
        .collect();
    Effect {
        name: effect.name,
        magnitude: effect.magnitude,
        duration: effect.duration,
        keywords,
    }
}

fn serialized_to_registry(ser: SerializedRegistry) -> Result<Registry, DeserializeError> {
    validate(&ser)?;

    let mut registry = Registry::from_ingredients(ser.ingredients.into_iter().map(|si| {
        Ingredient::new(si.name, si.effects.into_iter().map(deserialize_effect))
    }));
    registry.duplicates = ser.duplicates;
    Ok(registry)
}

fn validate(ser: &SerializedRegistry) -> Result<(), DeserializeError> {
    if ser.metadata.ingredient_count != ser.ingredients.len() {
        return Err(DeserializeError::Validation(format!(
            "metadata says {} ingredients but payload has {}",
            ser.metadata.ingredient_count,
            ser.ingredients.len()
        )));
    }
    let effect_count: usize = ser.ingredients.iter().map(|i| i.effects.len()).sum();
    if ser.metadata.effect_count != effect_count {
        return Err(DeserializeError::Validation(format!(
            "metadata says {} effects but payload has {effect_count}",
            ser.metadata.effect_count
        )));
    }

    let mut names = HashSet::with_capacity(ser.ingredients.len());
    for ingredient in &ser.ingredients {
        if ingredient.name.is_empty() {
            return Err(DeserializeError::Validation(
                "ingredient with an empty name".to_owned(),
            ));
        }
        if !names.insert(ingredient.name.to_lowercase()) {
            return Err(DeserializeError::Validation(format!(
                "duplicate ingredient '{}'",
                ingredient.name
            )));
        }
        if ingredient.effects.len() > EFFECT_SLOTS {
            return Err(DeserializeError::Validation(format!(
                "ingredient '{}' has {} effects, at most {EFFECT_SLOTS} allowed",
                ingredient.name,
                ingredient.effects.len()
            )));
        }
        if let Some(effect) = ingredient.effects.iter().find(|e| e.name.is_empty()) {
            return Err(DeserializeError::Validation(format!(
                "ingredient '{}' has an unnamed effect (magnitude {})",
                ingredient.name, effect.magnitude
            )));
        }
    }

    Ok(())
}

fn write_header(buf: &mut Vec<u8>, payload: &[u8]) {
    let hash = blake3::hash(payload);
    let hash_bytes = hash.as_bytes();

    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&REVISION.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes()); // flags
    #[allow(clippy::cast_possible_truncation)]
    let payload_len = payload.len() as u32;
    buf.extend_from_slice(&payload_len.to_le_bytes());
    buf.extend_from_slice(&hash_bytes[..16]);
}

#[allow(clippy::cast_possible_truncation)]
fn read_header(bytes: &[u8]) -> Result<(u16, u32, [u8; 16]), DeserializeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(DeserializeError::LengthMismatch {
            expected: HEADER_SIZE as u32,
            actual: bytes.len(),
        });
    }

    if &bytes[0..4] != MAGIC {
        return Err(DeserializeError::BadMagic);
    }

    let format_version = u16::from_le_bytes([bytes[4], bytes[5]]);
    let payload_len = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);

    let mut hash = [0u8; 16];
    hash.copy_from_slice(&bytes[16..32]);

    Ok((format_version, payload_len, hash))
}

pub(crate) fn encode(
    registry: &Registry,
    source_text: Option<&str>,
) -> Result<Vec<u8>, SerializeError> {
    let serialized = registry_to_serialized(registry, source_text);
    let payload = bincode::serde::encode_to_vec(&serialized, bincode::config::standard())?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    write_header(&mut buf, &payload);
    buf.extend_from_slice(&payload);
    Ok(buf)
}

fn decode_payload(bytes: &[u8]) -> Result<SerializedRegistry, DeserializeError> {
    let (format_version, payload_len, stored_hash) = read_header(bytes)?;

    if format_version != FORMAT_VERSION {
        return Err(DeserializeError::IncompatibleVersion {
            blob: format_version,
            supported: FORMAT_VERSION,
        });
    }

    let payload_end = HEADER_SIZE + payload_len as usize;
    if bytes.len() < payload_end {
        return Err(DeserializeError::LengthMismatch {
            expected: payload_len,
            actual: bytes.len() - HEADER_SIZE,
        });
    }
    let payload = &bytes[HEADER_SIZE..payload_end];

    if blake3::hash(payload).as_bytes()[..16] != stored_hash {
        return Err(DeserializeError::ChecksumMismatch);
    }

    let (serialized, _): (SerializedRegistry, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())?;
    Ok(serialized)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<Registry, DeserializeError> {
    serialized_to_registry(decode_payload(bytes)?)
}

/// The source-text digest embedded in a cache blob, if the blob is intact
/// and carries one.
pub(crate) fn source_digest(bytes: &[u8]) -> Option<[u8; 32]> {
    decode_payload(bytes).ok()?.metadata.source_digest
}

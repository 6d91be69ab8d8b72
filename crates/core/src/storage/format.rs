use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CoreError;
use crate::models::history::HistoryEntry;
use crate::models::settings::Theme;
use crate::models::subject::Catalog;

/// Current catalog schema version.
pub const CURRENT_VERSION: u16 = 2;

/// Version implied by a bare JSON array (records written before versioning).
pub const LEGACY_VERSION: u16 = 1;

/// Subject name only present in the retired v1 curriculum. A v1 catalog that
/// still contains it predates the curriculum change and is discarded.
pub const OBSOLETE_SUBJECT: &str = "Software Engineering (Theory)";

/// Stored shape of the catalog record:
///
/// ```text
/// {"version": 2, "subjects": [{"id": "...", "name": "...", "credits": 4.0}, ...]}
/// ```
#[derive(Debug, Serialize, Deserialize)]
struct CatalogRecord {
    version: u16,
    subjects: Catalog,
}

/// Result of decoding a stored catalog payload.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedCatalog {
    /// Already in the current schema
    Current(Catalog),
    /// Current schema, but some subjects had no id and were given fresh ones;
    /// should be written back so the ids stick
    MissingIds(Catalog),
    /// Read from an older schema; should be written back in the current one
    Migrated { from: u16, catalog: Catalog },
    /// Retired content; replace with defaults
    Stale { from: u16 },
}

pub fn encode_catalog(catalog: &Catalog) -> Result<String, CoreError> {
    let record = CatalogRecord {
        version: CURRENT_VERSION,
        subjects: catalog.clone(),
    };
    serde_json::to_string(&record)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize catalog: {e}")))
}

/// Parse a catalog payload of any known version.
///
/// Accepts the bare-array v1 layout and the versioned object layout.
/// Structural problems surface as `Deserialization`; the caller attaches the key.
pub fn decode_catalog(raw: &str) -> Result<DecodedCatalog, CoreError> {
    let value: Value = serde_json::from_str(raw)?;

    let (version, subjects) = match value {
        Value::Array(items) => (LEGACY_VERSION, Value::Array(items)),
        Value::Object(mut map) => {
            let version = map
                .get("version")
                .and_then(Value::as_u64)
                .ok_or_else(|| {
                    CoreError::Deserialization("catalog record has no numeric 'version'".into())
                })?;
            let version = u16::try_from(version)
                .map_err(|_| CoreError::UnsupportedVersion(u16::MAX))?;
            let subjects = map.remove("subjects").ok_or_else(|| {
                CoreError::Deserialization("catalog record has no 'subjects'".into())
            })?;
            (version, subjects)
        }
        other => {
            return Err(CoreError::Deserialization(format!(
                "expected a catalog array or object, found {}",
                json_kind(&other)
            )))
        }
    };

    if version == 0 || version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }

    let missing_ids = subjects
        .as_array()
        .is_some_and(|items| items.iter().any(|item| item.get("id").is_none()));
    let catalog: Catalog = serde_json::from_value(subjects)?;

    if version == CURRENT_VERSION {
        if missing_ids {
            return Ok(DecodedCatalog::MissingIds(catalog));
        }
        return Ok(DecodedCatalog::Current(catalog));
    }
    Ok(migrate_v1(catalog))
}

/// v1 → v2: drop catalogs from the retired curriculum; otherwise keep the
/// subjects as-is (ids were assigned while deserializing).
fn migrate_v1(catalog: Catalog) -> DecodedCatalog {
    if catalog.contains_name(OBSOLETE_SUBJECT) {
        DecodedCatalog::Stale {
            from: LEGACY_VERSION,
        }
    } else {
        DecodedCatalog::Migrated {
            from: LEGACY_VERSION,
            catalog,
        }
    }
}

pub fn encode_history(log: &[HistoryEntry]) -> Result<String, CoreError> {
    serde_json::to_string(log)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize history: {e}")))
}

pub fn decode_history(raw: &str) -> Result<Vec<HistoryEntry>, CoreError> {
    Ok(serde_json::from_str(raw)?)
}

pub fn encode_theme(theme: Theme) -> Result<String, CoreError> {
    serde_json::to_string(&theme)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize theme: {e}")))
}

/// Accepts both a JSON string (`"dark"`) and the bare word (`dark`).
pub fn decode_theme(raw: &str) -> Result<Theme, CoreError> {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') {
        return Ok(serde_json::from_str(trimmed)?);
    }
    match trimmed {
        "light" => Ok(Theme::Light),
        "dark" => Ok(Theme::Dark),
        other => Err(CoreError::Deserialization(format!("unknown theme '{other}'"))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

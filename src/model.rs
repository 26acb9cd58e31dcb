//! Shared data model types used by both native and web runtimes.
//!
//! Raw dataset records are loosely typed JSON; [`Entity::from_value`] turns
//! each one into a canonical creature record with every field defaulted.

use crate::error::LoadError;
use serde_json::Value;

/// Display name used for records without a usable `name`.
pub const UNKNOWN_NAME: &str = "Unknown";

/// A creature record, normalized for lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Display name, unique key of the entity index. Never empty.
    pub name: String,
    /// Lowercase of the raw name (empty when the record had no name).
    pub name_lower: String,
    /// Creature icon reference, used verbatim. Empty when absent.
    pub image: String,
    pub level: i64,
    pub hp: i64,
    pub mp: i64,
    pub exp: i64,
    pub locations: Vec<String>,
    /// Dropped item names in dataset order.
    pub drops: Vec<String>,
    /// `drops[i].to_lowercase()` for every `i`.
    pub drops_lower: Vec<String>,
    /// Rich text, stored as given.
    pub notes: String,
    /// Rich text, stored as given.
    pub episode: String,
}

impl Entity {
    /// Normalizes one raw record. Never fails: missing or mistyped fields fall
    /// back to their defaults.
    pub fn from_value(value: &Value) -> Self {
        let raw_name = string_field(value, "name");
        let name = if raw_name.is_empty() {
            UNKNOWN_NAME.to_string()
        } else {
            raw_name.clone()
        };
        let drops = string_list_field(value, "drops");
        let drops_lower = drops.iter().map(|d| d.to_lowercase()).collect();

        Self {
            name_lower: raw_name.to_lowercase(),
            name,
            image: string_field(value, "image"),
            level: number_field(value, "level"),
            hp: number_field(value, "hp"),
            mp: number_field(value, "mp"),
            exp: number_field(value, "exp"),
            locations: string_list_field(value, "locations"),
            drops,
            drops_lower,
            notes: string_field(value, "notes"),
            episode: string_field(value, "episode"),
        }
    }
}

/// Normalizes every record, preserving input order.
pub fn normalize_all(records: &[Value]) -> Vec<Entity> {
    records.iter().map(Entity::from_value).collect()
}

/// Parses a dataset document. The top level must be a JSON array; individual
/// records are not validated here.
pub fn parse_dataset(text: &str) -> Result<Vec<Value>, LoadError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Array(records) => Ok(records),
        _ => Err(LoadError::NotAnArray),
    }
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

fn string_list_field(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Accepts integers, floats (truncated) and numeric strings; anything else is 0.
fn number_field(value: &Value, key: &str) -> i64 {
    match value.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

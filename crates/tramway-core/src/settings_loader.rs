//! Settings loading from configuration files.
//!
//! This module provides functions to load [`Settings`] from TOML files, JSON
//! files, and to apply environment variable overrides.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `TRAMWAY_DEBUG` | `debug` |
//! | `TRAMWAY_LOG_LEVEL` | `log_level` |
//! | `TRAMWAY_STRICT_TEMPLATE_ORDERING` | `strict_template_ordering` |
//! | `TRAMWAY_MAX_ROUTING_DEPTH` | `max_routing_depth` |
//! | `TRAMWAY_DECODE_PATH` | `decode_path` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use tramway_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file("config/routing.toml").unwrap();
//! let settings = settings_loader::from_toml_file_with_env("config/routing.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::RoutingError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Any fields not present in the TOML keep their default values.
///
/// # Errors
///
/// Returns an error if the TOML is malformed, cannot be deserialized, or
/// describes invalid settings.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, RoutingError> {
    // Deserialize into a JSON value first so it can be merged over the
    // serialized defaults.
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| RoutingError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    from_value(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns [`RoutingError::IoError`] if the file cannot be read, or a
/// configuration error if the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, RoutingError> {
    let content = std::fs::read_to_string(path)?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, RoutingError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    validate(&settings)?;
    Ok(settings)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<Settings, RoutingError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| RoutingError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    from_value(json_value, "JSON")
}

/// Loads settings from a JSON file.
///
/// # Errors
///
/// Returns [`RoutingError::IoError`] if the file cannot be read, or a
/// configuration error if the JSON is malformed.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, RoutingError> {
    let content = std::fs::read_to_string(path)?;
    from_json_str(&content)
}

/// Loads settings from just environment variables (starting from defaults).
///
/// # Errors
///
/// Returns an error if the overridden settings are invalid.
pub fn from_env() -> Result<Settings, RoutingError> {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    validate(&settings)?;
    Ok(settings)
}

/// Applies environment variable overrides to a settings struct.
///
/// Boolean variables accept "true"/"1"/"yes" as true and anything else as
/// false. Unparsable numbers leave the setting unchanged.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("TRAMWAY_DEBUG") {
        settings.debug = parse_bool(&val);
    }

    if let Ok(val) = std::env::var("TRAMWAY_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Ok(val) = std::env::var("TRAMWAY_STRICT_TEMPLATE_ORDERING") {
        settings.strict_template_ordering = parse_bool(&val);
    }

    if let Ok(val) = std::env::var("TRAMWAY_MAX_ROUTING_DEPTH") {
        if let Ok(depth) = val.parse::<usize>() {
            settings.max_routing_depth = depth;
        }
    }

    if let Ok(val) = std::env::var("TRAMWAY_DECODE_PATH") {
        settings.decode_path = parse_bool(&val);
    }
}

/// Checks that the settings describe a usable routing configuration.
///
/// # Errors
///
/// Returns [`RoutingError::ConfigurationError`] if `max_routing_depth` is zero.
pub fn validate(settings: &Settings) -> Result<(), RoutingError> {
    if settings.max_routing_depth == 0 {
        return Err(RoutingError::ConfigurationError(
            "max_routing_depth must be at least 1".to_string(),
        ));
    }
    Ok(())
}

// ============================================================
// Helpers
// ============================================================

fn parse_bool(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "true" | "1" | "yes")
}

/// Merges `value` over the default settings and deserializes the result.
fn from_value(value: serde_json::Value, format: &str) -> Result<Settings, RoutingError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        RoutingError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, value);
    let settings: Settings = serde_json::from_value(merged).map_err(|e| {
        RoutingError::ConfigurationError(format!(
            "Failed to deserialize settings from {format}: {e}"
        ))
    })?;
    validate(&settings)?;
    Ok(settings)
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}

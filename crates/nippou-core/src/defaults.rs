//! Bundled default checklist.
//!
//! Used whenever no stored configuration exists, when the store cannot be
//! reached, and as the content written by a reset.

use crate::model::Configuration;
use crate::normalize::normalize;
use serde_json::Value;
use tracing::error;

/// Raw text of the bundled defaults document (persisted shape).
pub const DEFAULTS_JSON: &str = include_str!("../defaults.json");

/// The bundled defaults as a raw JSON document.
#[must_use]
pub fn document() -> Value {
    serde_json::from_str(DEFAULTS_JSON).unwrap_or_else(|err| {
        error!(%err, "bundled defaults.json is not valid JSON");
        Value::Object(serde_json::Map::new())
    })
}

/// The bundled defaults, normalized.
#[must_use]
pub fn config() -> Configuration {
    normalize(&document())
}

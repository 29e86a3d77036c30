//! Configuration store contract and local implementations.
//!
//! The store is a single mutable slot holding one whole document. Loads never
//! fail from the caller's point of view: any problem yields the bundled
//! defaults plus a warning to show the user. Saves and resets replace the
//! whole document and are gated by a shared admin token. Concurrent writers
//! are not coordinated; the last write wins.

use crate::defaults;
use crate::error::ErrorCode;
use crate::model::Configuration;
use crate::normalize::normalize;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{info, warn};

/// Fixed key of the single stored document.
pub const STORE_KEY: &str = "nippou-config.json";

/// Where a loaded document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadSource {
    /// The persisted document.
    Stored,
    /// The bundled defaults (nothing stored, or the store failed).
    Defaults,
}

impl LoadSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stored => "stored",
            Self::Defaults => "defaults",
        }
    }
}

/// Result of a load: always carries a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    pub source: LoadSource,
    pub document: Value,
    /// Set when the load degraded to defaults because of a failure.
    pub warning: Option<String>,
}

impl Loaded {
    #[must_use]
    pub fn stored(document: Value) -> Self {
        Self {
            source: LoadSource::Stored,
            document,
            warning: None,
        }
    }

    /// Nothing stored; the bundled defaults apply.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            source: LoadSource::Defaults,
            document: defaults::document(),
            warning: None,
        }
    }

    /// The store failed; fall back to the bundled defaults.
    #[must_use]
    pub fn fallback(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        warn!(%reason, "configuration load failed, falling back to defaults");
        Self {
            warning: Some(reason),
            ..Self::defaults()
        }
    }

    /// The loaded document, normalized.
    #[must_use]
    pub fn config(&self) -> Configuration {
        normalize(&self.document)
    }
}

/// Errors from save and reset.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Missing or wrong admin token.
    #[error("unauthorized: admin token rejected")]
    Unauthorized,

    /// The document failed save-path validation; nothing was written.
    #[error("invalid configuration payload: {0}")]
    InvalidPayload(String),

    /// The remote store could not be reached or answered with a failure.
    #[error("store unreachable: {0}")]
    Transport(String),

    #[error("store I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode configuration: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Unauthorized => ErrorCode::Unauthorized,
            Self::InvalidPayload(_) => ErrorCode::InvalidPayload,
            Self::Transport(_) => ErrorCode::StoreUnreachable,
            Self::Io(_) => ErrorCode::StoreWriteFailed,
            Self::Encode(_) => ErrorCode::InternalUnexpected,
        }
    }

    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}

/// A single-slot configuration store.
pub trait ConfigStore {
    /// Load the current document, or the bundled defaults.
    fn load(&self) -> Loaded;

    /// Replace the stored document.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unauthorized`] for a rejected token,
    /// [`StoreError::InvalidPayload`] when `categories` is missing or not an
    /// array, and transport/I/O errors from the backing store.
    fn save(&self, document: &Value, token: &str) -> Result<(), StoreError>;

    /// Make the next load return the bundled defaults.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigStore::save`], minus payload validation.
    fn reset(&self, token: &str) -> Result<(), StoreError>;
}

/// Save-path validation: the document must be an object with a
/// `categories` array.
///
/// # Errors
///
/// Returns [`StoreError::InvalidPayload`] describing the problem.
pub fn validate_payload(document: &Value) -> Result<(), StoreError> {
    let Some(obj) = document.as_object() else {
        return Err(StoreError::InvalidPayload(
            "document must be a JSON object".to_string(),
        ));
    };
    match obj.get("categories") {
        Some(Value::Array(_)) => Ok(()),
        Some(_) => Err(StoreError::InvalidPayload(
            "categories must be an array".to_string(),
        )),
        None => Err(StoreError::InvalidPayload(
            "missing categories[]".to_string(),
        )),
    }
}

/// Validate and reduce a document to the persisted `{version, categories}`.
///
/// # Errors
///
/// Propagates [`validate_payload`] failures.
pub fn save_payload(document: &Value) -> Result<Value, StoreError> {
    validate_payload(document)?;
    let version = document
        .get("version")
        .filter(|v| is_truthy(v))
        .cloned()
        .unwrap_or_else(|| json!(1));
    Ok(json!({
        "version": version,
        "categories": document["categories"].clone(),
    }))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Check a presented token against the configured secret.
///
/// With no secret configured every write is refused.
fn authorize(expected: Option<&str>, presented: &str) -> Result<(), StoreError> {
    match expected {
        Some(secret) if !secret.is_empty() && secret == presented => Ok(()),
        _ => Err(StoreError::Unauthorized),
    }
}

/// In-process store, mainly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<Value>>,
    admin_token: Option<String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(admin_token: Option<String>) -> Self {
        Self {
            slot: Mutex::new(None),
            admin_token,
        }
    }

    /// Pre-populate the slot, bypassing authorization.
    #[must_use]
    pub fn with_document(self, document: Value) -> Self {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(document);
        self
    }

    /// Snapshot of the stored document, if any.
    #[must_use]
    pub fn stored(&self) -> Option<Value> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self) -> Loaded {
        self.stored().map_or_else(Loaded::defaults, Loaded::stored)
    }

    fn save(&self, document: &Value, token: &str) -> Result<(), StoreError> {
        authorize(self.admin_token.as_deref(), token)?;
        let payload = save_payload(document)?;
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(payload);
        Ok(())
    }

    fn reset(&self, token: &str) -> Result<(), StoreError> {
        authorize(self.admin_token.as_deref(), token)?;
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(defaults::document());
        Ok(())
    }
}

/// Store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    admin_token: Option<String>,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, admin_token: Option<String>) -> Self {
        Self {
            path: path.into(),
            admin_token,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_document(&self, document: &Value) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(document)?;
        write_atomic(&self.path, &text)?;
        Ok(())
    }
}

impl ConfigStore for FileStore {
    fn load(&self) -> Loaded {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Loaded::defaults(),
            Err(err) => {
                return Loaded::fallback(format!(
                    "failed to read {}: {err}",
                    self.path.display()
                ));
            }
        };

        match serde_json::from_str::<Value>(&text) {
            Ok(document) => Loaded::stored(document),
            Err(err) => Loaded::fallback(format!(
                "stored configuration at {} is not valid JSON: {err}",
                self.path.display()
            )),
        }
    }

    fn save(&self, document: &Value, token: &str) -> Result<(), StoreError> {
        authorize(self.admin_token.as_deref(), token)?;
        let payload = save_payload(document)?;
        self.write_document(&payload)?;
        info!(path = %self.path.display(), "saved configuration");
        Ok(())
    }

    fn reset(&self, token: &str) -> Result<(), StoreError> {
        authorize(self.admin_token.as_deref(), token)?;
        self.write_document(&defaults::document())?;
        info!(path = %self.path.display(), "reset configuration to defaults");
        Ok(())
    }
}

/// Write `contents` to `path` through a sibling temp file and a rename, so
/// readers see either the old or the new document.
///
/// # Errors
///
/// Returns any I/O error from creating the parent, writing, or renaming.
pub fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}

//! Per-item answers for one report pass.
//!
//! Answers are ephemeral: keyed by `(category id, item id)`, never
//! persisted. Two collectors fill them: command-line specs
//! (`category/item` or `category/item=N`) and a JSON answers document.

use crate::error::ErrorCode;
use crate::model::Configuration;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// User input for a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Answer {
    pub checked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
}

impl Answer {
    /// A checked answer without a value.
    #[must_use]
    pub const fn checked() -> Self {
        Self {
            checked: true,
            value: None,
        }
    }

    /// A checked answer carrying `value`.
    #[must_use]
    pub const fn with_value(value: u32) -> Self {
        Self {
            checked: true,
            value: Some(value),
        }
    }
}

/// Errors raised while collecting answers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnswerError {
    #[error("malformed answer '{0}': expected category/item or category/item=N")]
    MalformedSpec(String),

    #[error("invalid value '{value}' for {category}/{item}: expected a non-negative integer")]
    InvalidValue {
        category: String,
        item: String,
        value: String,
    },

    #[error("answers document must be an object keyed by category id")]
    NotAnObject,

    #[error("answers for category '{0}' must be an object keyed by item id")]
    CategoryNotAnObject(String),
}

impl AnswerError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::InvalidAnswer
    }
}

/// Answers keyed by category id, then item id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers {
    entries: BTreeMap<String, BTreeMap<String, Answer>>,
}

impl Answers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or replace) the answer for one item.
    pub fn insert(&mut self, category: impl Into<String>, item: impl Into<String>, answer: Answer) {
        self.entries
            .entry(category.into())
            .or_default()
            .insert(item.into(), answer);
    }

    /// Mark an item as checked without a value.
    pub fn check(&mut self, category: impl Into<String>, item: impl Into<String>) {
        self.insert(category, item, Answer::checked());
    }

    #[must_use]
    pub fn get(&self, category: &str, item: &str) -> Option<&Answer> {
        self.entries.get(category).and_then(|items| items.get(item))
    }

    /// Whether the item is answered and checked.
    #[must_use]
    pub fn is_checked(&self, category: &str, item: &str) -> bool {
        self.get(category, item).is_some_and(|a| a.checked)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overlay `other` onto `self`; entries in `other` win.
    pub fn merge(&mut self, other: Self) {
        for (category, items) in other.entries {
            let slot = self.entries.entry(category).or_default();
            slot.extend(items);
        }
    }

    /// Keys that do not resolve to an item in `config`, in key order.
    #[must_use]
    pub fn unknown_keys(&self, config: &Configuration) -> Vec<(String, String)> {
        self.entries
            .iter()
            .flat_map(|(category, items)| {
                let known = config.category(category);
                items
                    .keys()
                    .filter(move |item| known.and_then(|c| c.item(item)).is_none())
                    .map(move |item| (category.clone(), item.clone()))
            })
            .collect()
    }

    /// Known items answered with a value their kind has no use for
    /// (plain check items), in key order.
    #[must_use]
    pub fn ignored_values(&self, config: &Configuration) -> Vec<(String, String)> {
        self.entries
            .iter()
            .flat_map(|(category, items)| {
                let known = config.category(category);
                items
                    .iter()
                    .filter(move |(item, answer)| {
                        answer.value.is_some()
                            && known
                                .and_then(|c| c.item(item))
                                .is_some_and(|i| !i.kind.takes_value())
                    })
                    .map(move |(item, _)| (category.clone(), item.clone()))
            })
            .collect()
    }

    /// Collect answers from command-line specs.
    ///
    /// # Errors
    ///
    /// Returns the first [`AnswerError`] hit while parsing a spec.
    pub fn from_specs<I, S>(specs: I) -> Result<Self, AnswerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut answers = Self::new();
        for spec in specs {
            let (category, item, answer) = parse_spec(spec.as_ref())?;
            answers.insert(category, item, answer);
        }
        Ok(answers)
    }

    /// Collect answers from a JSON document.
    ///
    /// Each item entry may be `true`/`false`, a number (checked with that
    /// value), `null` (skipped), or `{ "checked": bool, "value": N }`.
    ///
    /// # Errors
    ///
    /// Returns an [`AnswerError`] when the document or an entry has the
    /// wrong shape.
    pub fn from_json(doc: &Value) -> Result<Self, AnswerError> {
        let categories = doc.as_object().ok_or(AnswerError::NotAnObject)?;
        let mut answers = Self::new();

        for (category, items) in categories {
            let items = items
                .as_object()
                .ok_or_else(|| AnswerError::CategoryNotAnObject(category.clone()))?;
            for (item, entry) in items {
                if let Some(answer) = answer_from_json(category, item, entry)? {
                    answers.insert(category.clone(), item.clone(), answer);
                }
            }
        }

        Ok(answers)
    }
}

/// Parse `category/item` or `category/item=N`.
///
/// # Errors
///
/// Returns [`AnswerError::MalformedSpec`] when either id is missing and
/// [`AnswerError::InvalidValue`] when `N` is not a non-negative integer.
pub fn parse_spec(spec: &str) -> Result<(String, String, Answer), AnswerError> {
    let (path, value) = match spec.split_once('=') {
        Some((path, value)) => (path, Some(value.trim())),
        None => (spec, None),
    };

    let (category, item) = path
        .split_once('/')
        .map(|(c, i)| (c.trim(), i.trim()))
        .filter(|(c, i)| !c.is_empty() && !i.is_empty())
        .ok_or_else(|| AnswerError::MalformedSpec(spec.to_string()))?;

    let answer = match value {
        None | Some("") => Answer::checked(),
        Some(raw) => {
            let parsed = raw.parse::<u32>().map_err(|_| AnswerError::InvalidValue {
                category: category.to_string(),
                item: item.to_string(),
                value: raw.to_string(),
            })?;
            Answer::with_value(parsed)
        }
    };

    Ok((category.to_string(), item.to_string(), answer))
}

fn answer_from_json(category: &str, item: &str, entry: &Value) -> Result<Option<Answer>, AnswerError> {
    let invalid = || AnswerError::InvalidValue {
        category: category.to_string(),
        item: item.to_string(),
        value: entry.to_string(),
    };

    match entry {
        Value::Null => Ok(None),
        Value::Bool(checked) => Ok(Some(Answer {
            checked: *checked,
            value: None,
        })),
        Value::Number(_) => json_value(entry)
            .map(|v| Some(Answer::with_value(v)))
            .ok_or_else(invalid),
        Value::Object(obj) => {
            let checked = obj.get("checked").and_then(Value::as_bool).unwrap_or(false);
            let value = match obj.get("value") {
                None | Some(Value::Null) => None,
                Some(v) => Some(json_value(v).ok_or_else(invalid)?),
            };
            Ok(Some(Answer { checked, value }))
        }
        Value::String(_) | Value::Array(_) => Err(invalid()),
    }
}

fn json_value(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|v| u32::try_from(v).ok())
}

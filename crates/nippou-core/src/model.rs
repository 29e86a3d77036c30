//! Canonical checklist configuration.
//!
//! This is the shape every other module works with after
//! [`normalize`](crate::normalize::normalize) has run: ids are present and
//! unique among siblings, `order` fields match sequence positions, and every
//! item carries one of the three kinds. The serialized form is the persisted
//! document shape (`name` for display text, flat `type`/`suffix` on items).

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Root document: an ordered list of categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub version: u32,
    pub categories: Vec<Category>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            version: 1,
            categories: Vec::new(),
        }
    }
}

/// A named, ordered group of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub order: u32,
    pub items: Vec<Item>,
}

/// A single checklist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: ItemKind,
    pub order: u32,
}

/// What extra input an item accepts, with its kind-specific payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemKind {
    /// Plain checkbox.
    #[default]
    Check,
    /// Checkbox plus a count, rendered with an optional unit suffix.
    Count {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        suffix: Option<String>,
    },
    /// Checkbox plus a consecutive-day counter.
    Streak,
}

impl ItemKind {
    /// Wire name of the kind (`check`, `count`, `streak`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::Count { .. } => "count",
            Self::Streak => "streak",
        }
    }

    /// Unit suffix for count items; `None` for other kinds or when unset.
    #[must_use]
    pub fn suffix(&self) -> Option<&str> {
        match self {
            Self::Count { suffix } => suffix.as_deref(),
            Self::Check | Self::Streak => None,
        }
    }

    /// Whether the kind takes a numeric value alongside the checkbox.
    #[must_use]
    pub const fn takes_value(&self) -> bool {
        matches!(self, Self::Count { .. } | Self::Streak)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an item kind from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKindError {
    pub got: String,
}

impl fmt::Display for ParseKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid item type: '{}' (expected check, count, or streak)", self.got)
    }
}

impl std::error::Error for ParseKindError {}

impl FromStr for ItemKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "check" => Ok(Self::Check),
            "count" => Ok(Self::Count { suffix: None }),
            "streak" => Ok(Self::Streak),
            _ => Err(ParseKindError { got: s.to_string() }),
        }
    }
}

impl Configuration {
    /// Rewrite every `order` field from sequence position (1-based).
    pub fn recompute_order(&mut self) {
        for (pos, category) in (1_u32..).zip(self.categories.iter_mut()) {
            category.order = pos;
            for (item_pos, item) in (1_u32..).zip(category.items.iter_mut()) {
                item.order = item_pos;
            }
        }
    }

    /// Index of the category with `id`.
    #[must_use]
    pub fn category_index(&self, id: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.id == id)
    }

    /// Look up a category by id.
    #[must_use]
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Total number of items across every category.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }
}

impl Category {
    /// Index of the item with `id` inside this category.
    #[must_use]
    pub fn item_index(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.id == id)
    }

    /// Look up an item by id.
    #[must_use]
    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }
}

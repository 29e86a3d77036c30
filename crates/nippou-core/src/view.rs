//! Rendering shape of a configuration.
//!
//! Display surfaces use `title` for categories and `label` for items; the
//! persisted document uses `name` for both.

use crate::model::{Category, Configuration, Item};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryView {
    pub id: String,
    pub title: String,
    pub items: Vec<ItemView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemView {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl From<&Item> for ItemView {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            label: item.name.clone(),
            kind: item.kind.as_str(),
            suffix: item.kind.suffix().map(ToString::to_string),
        }
    }
}

impl From<&Category> for CategoryView {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.clone(),
            title: category.name.clone(),
            items: category.items.iter().map(ItemView::from).collect(),
        }
    }
}

/// Map a configuration to the rendering shape, preserving sequence order.
#[must_use]
pub fn render_view(config: &Configuration) -> Vec<CategoryView> {
    config.categories.iter().map(CategoryView::from).collect()
}

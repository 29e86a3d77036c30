//! Tolerant normalization of loosely-typed configuration documents.
//!
//! [`normalize`] never fails. Anything malformed is replaced with a default:
//! a missing `version` becomes 1, a non-array `categories` becomes empty,
//! missing or duplicated ids are re-assigned from the display name, and an
//! absent or unknown item `type` becomes `check`. Stored `order` values are
//! ignored; order always comes from sequence position.
//!
//! Both naming shapes are accepted: `name` (editable shape) or `title` /
//! `label` (rendering shape). Output is always the canonical `name` shape.
//!
//! Normalizing the serialized output again yields the same configuration.

use crate::model::{Category, Configuration, Item, ItemKind};
use crate::slug;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::debug;

/// Label used for id assignment when a category has no display name.
const CATEGORY_FALLBACK_LABEL: &str = "cat";
/// Label used for id assignment when an item has no display name.
pub(crate) const ITEM_FALLBACK_LABEL: &str = "item";

/// Canonicalize a raw document into a fully ordered, fully identified
/// [`Configuration`].
#[must_use]
pub fn normalize(raw: &Value) -> Configuration {
    let version = coerce_version(raw.get("version"));

    let raw_categories: &[Value] = match raw.get("categories") {
        Some(Value::Array(entries)) => entries.as_slice(),
        Some(other) => {
            debug!(found = %kind_name(other), "categories is not an array, using empty list");
            &[]
        }
        None => &[],
    };

    let mut used_category_ids = BTreeSet::new();
    let mut categories = Vec::with_capacity(raw_categories.len());

    for (index, entry) in raw_categories.iter().enumerate() {
        let Some(obj) = entry.as_object() else {
            debug!(index, found = %kind_name(entry), "skipping non-object category entry");
            continue;
        };

        let name = display_text(obj, &["name", "title"]);
        let id = resolve_id(obj, &name, CATEGORY_FALLBACK_LABEL, &used_category_ids);
        used_category_ids.insert(id.clone());

        let items = normalize_items(obj, &id);
        categories.push(Category {
            id,
            name,
            order: 0,
            items,
        });
    }

    let mut config = Configuration {
        version,
        categories,
    };
    config.recompute_order();
    config
}

fn normalize_items(category: &Map<String, Value>, category_id: &str) -> Vec<Item> {
    let raw_items: &[Value] = match category.get("items") {
        Some(Value::Array(entries)) => entries.as_slice(),
        Some(other) => {
            debug!(category = category_id, found = %kind_name(other), "items is not an array, using empty list");
            &[]
        }
        None => &[],
    };

    let mut used_item_ids = BTreeSet::new();
    let mut items = Vec::with_capacity(raw_items.len());

    for (index, entry) in raw_items.iter().enumerate() {
        let Some(obj) = entry.as_object() else {
            debug!(category = category_id, index, "skipping non-object item entry");
            continue;
        };

        let name = display_text(obj, &["name", "label"]);
        let id = resolve_id(obj, &name, ITEM_FALLBACK_LABEL, &used_item_ids);
        used_item_ids.insert(id.clone());

        items.push(Item {
            kind: resolve_kind(obj, category_id, &id),
            id,
            name,
            order: 0,
        });
    }

    items
}

/// Keep an existing unique id, otherwise assign one from the display name.
fn resolve_id(
    obj: &Map<String, Value>,
    name: &str,
    fallback_label: &str,
    used: &BTreeSet<String>,
) -> String {
    let label = if name.trim().is_empty() {
        fallback_label
    } else {
        name
    };

    match obj.get("id").and_then(id_text) {
        Some(existing) if !used.contains(&existing) => existing,
        Some(duplicate) => {
            let fresh = slug::assign(label, used);
            debug!(duplicate = %duplicate, assigned = %fresh, "re-assigned duplicate id");
            fresh
        }
        None => {
            let fresh = slug::assign(label, used);
            debug!(assigned = %fresh, "assigned missing id");
            fresh
        }
    }
}

fn resolve_kind(obj: &Map<String, Value>, category_id: &str, item_id: &str) -> ItemKind {
    let declared = obj.get("type").and_then(Value::as_str);
    let kind = match declared.map(str::parse::<ItemKind>) {
        Some(Ok(kind)) => kind,
        Some(Err(err)) => {
            debug!(category = category_id, item = item_id, %err, "unknown item type, using check");
            ItemKind::Check
        }
        None => ItemKind::Check,
    };

    match kind {
        ItemKind::Count { .. } => ItemKind::Count {
            suffix: obj
                .get("suffix")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string),
        },
        other => other,
    }
}

/// Truthy id text: non-blank strings and non-zero numbers.
fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// First present display field among `keys`, as text.
fn display_text(obj: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find_map(|value| match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn coerce_version(value: Option<&Value>) -> u32 {
    let parsed = match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 1.0).map(|f| f.trunc() as u64)),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    parsed
        .filter(|v| *v > 0)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(1)
}

const fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn renormalize(cfg: &Configuration) -> Configuration {
        normalize(&serde_json::to_value(cfg).expect("serialize"))
    }

    #[test]
    fn empty_object_yields_empty_config() {
        let cfg = normalize(&json!({}));
        assert_eq!(cfg, Configuration::default());
    }

    #[test]
    fn non_object_root_yields_empty_config() {
        assert_eq!(normalize(&json!([1, 2])), Configuration::default());
        assert_eq!(normalize(&Value::Null), Configuration::default());
    }

    #[test]
    fn version_coercion() {
        assert_eq!(normalize(&json!({ "version": 3 })).version, 3);
        assert_eq!(normalize(&json!({ "version": "2" })).version, 2);
        assert_eq!(normalize(&json!({ "version": 2.7 })).version, 2);
        assert_eq!(normalize(&json!({ "version": 0 })).version, 1);
        assert_eq!(normalize(&json!({ "version": -4 })).version, 1);
        assert_eq!(normalize(&json!({ "version": "v9" })).version, 1);
    }

    #[test]
    fn categories_not_array_defaults_to_empty() {
        let cfg = normalize(&json!({ "categories": { "work": {} } }));
        assert!(cfg.categories.is_empty());
    }

    #[test]
    fn missing_ids_are_assigned_from_names() {
        let cfg = normalize(&json!({
            "categories": [
                { "name": "Work", "items": [ { "name": "Report A" }, { "name": "Report A" } ] },
                { "name": "Work" },
                { "items": [] }
            ]
        }));

        let ids: Vec<_> = cfg.categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["work", "work-1", "cat"]);

        let item_ids: Vec<_> = cfg.categories[0].items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(item_ids, ["report-a", "report-a-1"]);
    }

    #[test]
    fn duplicate_ids_are_reassigned() {
        let cfg = normalize(&json!({
            "categories": [
                { "id": "study", "name": "Study" },
                { "id": "study", "name": "Reading" }
            ]
        }));
        assert_eq!(cfg.categories[0].id, "study");
        assert_eq!(cfg.categories[1].id, "reading");
    }

    #[test]
    fn item_ids_are_scoped_per_category() {
        let cfg = normalize(&json!({
            "categories": [
                { "id": "a", "items": [ { "id": "same" } ] },
                { "id": "b", "items": [ { "id": "same" } ] }
            ]
        }));
        assert_eq!(cfg.categories[0].items[0].id, "same");
        assert_eq!(cfg.categories[1].items[0].id, "same");
    }

    #[test]
    fn falsy_ids_count_as_missing() {
        let cfg = normalize(&json!({
            "categories": [ { "id": "", "name": "Gym" }, { "id": null, "name": "Gym" }, { "id": 0, "name": "Run" } ]
        }));
        let ids: Vec<_> = cfg.categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["gym", "gym-1", "run"]);
    }

    #[test]
    fn rendering_shape_names_are_accepted() {
        let cfg = normalize(&json!({
            "categories": [ { "id": "work", "title": "お仕事", "items": [ { "id": "bo-e", "label": "業務E" } ] } ]
        }));
        assert_eq!(cfg.categories[0].name, "お仕事");
        assert_eq!(cfg.categories[0].items[0].name, "業務E");
    }

    #[test]
    fn name_wins_over_title() {
        let cfg = normalize(&json!({ "categories": [ { "name": "A", "title": "B" } ] }));
        assert_eq!(cfg.categories[0].name, "A");
    }

    #[test]
    fn item_type_defaults_to_check() {
        let cfg = normalize(&json!({
            "categories": [ { "id": "c", "items": [
                { "id": "a" },
                { "id": "b", "type": "slider" },
                { "id": "c", "type": "streak" },
                { "id": "d", "type": "count", "suffix": "本" },
                { "id": "e", "type": "count", "suffix": "" },
                { "id": "f", "type": "check", "suffix": "ignored" }
            ] } ]
        }));
        let kinds: Vec<_> = cfg.categories[0].items.iter().map(|i| i.kind.clone()).collect();
        assert_eq!(
            kinds,
            [
                ItemKind::Check,
                ItemKind::Check,
                ItemKind::Streak,
                ItemKind::Count { suffix: Some("本".into()) },
                ItemKind::Count { suffix: None },
                ItemKind::Check,
            ]
        );
    }

    #[test]
    fn stored_order_is_ignored() {
        let cfg = normalize(&json!({
            "categories": [
                { "id": "b", "order": 2, "items": [ { "id": "y", "order": 9 }, { "id": "x", "order": 1 } ] },
                { "id": "a", "order": 1 }
            ]
        }));
        assert_eq!(cfg.categories[0].id, "b");
        assert_eq!(cfg.categories[0].order, 1);
        assert_eq!(cfg.categories[1].order, 2);
        assert_eq!(cfg.categories[0].items[0].id, "y");
        assert_eq!(cfg.categories[0].items[0].order, 1);
        assert_eq!(cfg.categories[0].items[1].order, 2);
    }

    #[test]
    fn non_object_entries_are_skipped() {
        let cfg = normalize(&json!({
            "categories": [ "oops", { "id": "ok", "items": [ 3, { "id": "i" } ] } ]
        }));
        assert_eq!(cfg.categories.len(), 1);
        assert_eq!(cfg.categories[0].order, 1);
        assert_eq!(cfg.categories[0].items.len(), 1);
    }

    #[test]
    fn normalization_is_idempotent_on_messy_input() {
        let raw = json!({
            "version": "4",
            "categories": [
                { "title": "Work", "items": [ { "label": "A" }, { "id": "a", "type": "count" } ] },
                { "id": "work", "name": "Other" },
                { "name": "  " }
            ]
        });
        let once = normalize(&raw);
        assert_eq!(renormalize(&once), once);
    }
}

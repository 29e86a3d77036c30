//! Admin editing over an explicitly owned working configuration.
//!
//! Categories and items are addressed by id; destination positions are
//! 0-based indices. Every mutation finishes by recomputing `order` so the
//! configuration is always ready to save.

use crate::error::ErrorCode;
use crate::model::{Category, Configuration, Item, ItemKind};
use crate::normalize::normalize;
use crate::reorder;
use crate::slug;
use serde_json::Value;
use std::collections::BTreeSet;

/// Errors raised by session edits and working-buffer text handling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("category '{0}' not found")]
    CategoryNotFound(String),

    #[error("item '{item}' not found in category '{category}'")]
    ItemNotFound { category: String, item: String },

    #[error("name must not be empty")]
    EmptyName,

    #[error("malformed configuration JSON at line {line}, column {column}: {message}")]
    Malformed {
        line: usize,
        column: usize,
        message: String,
    },
}

impl SessionError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::CategoryNotFound(_) => ErrorCode::CategoryNotFound,
            Self::ItemNotFound { .. } => ErrorCode::ItemNotFound,
            Self::EmptyName => ErrorCode::EmptyName,
            Self::Malformed { .. } => ErrorCode::MalformedDocument,
        }
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

/// Parse working-buffer text into a raw document.
///
/// # Errors
///
/// Returns [`SessionError::Malformed`] with the parser's position.
pub fn parse_document(text: &str) -> Result<Value, SessionError> {
    Ok(serde_json::from_str(text)?)
}

/// Re-indent JSON text with two spaces.
///
/// # Errors
///
/// Returns [`SessionError::Malformed`] when `text` is not valid JSON.
pub fn pretty(text: &str) -> Result<String, SessionError> {
    let value = parse_document(text)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

/// The working configuration plus every admin action on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    config: Configuration,
}

impl EditSession {
    /// Start a session on an already-normalized configuration.
    #[must_use]
    pub fn new(mut config: Configuration) -> Self {
        config.recompute_order();
        Self { config }
    }

    /// Start a session from a raw document.
    #[must_use]
    pub fn from_document(raw: &Value) -> Self {
        Self {
            config: normalize(raw),
        }
    }

    /// Start a session from working-buffer text.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Malformed`] when the text is not valid JSON.
    pub fn from_text(text: &str) -> Result<Self, SessionError> {
        Ok(Self::from_document(&parse_document(text)?))
    }

    #[must_use]
    pub const fn config(&self) -> &Configuration {
        &self.config
    }

    #[must_use]
    pub fn into_config(self) -> Configuration {
        self.config
    }

    /// Serialize the working configuration as pretty JSON.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.config)
    }

    /// Append a new empty category; returns its assigned id.
    ///
    /// # Errors
    ///
    /// [`SessionError::EmptyName`] for a blank name.
    pub fn add_category(&mut self, name: &str) -> Result<String, SessionError> {
        let name = non_empty(name)?;
        let used: BTreeSet<String> = self.config.categories.iter().map(|c| c.id.clone()).collect();
        let id = slug::assign(name, &used);
        self.config.categories.push(Category {
            id: id.clone(),
            name: name.to_string(),
            order: 0,
            items: Vec::new(),
        });
        self.finish();
        Ok(id)
    }

    /// Append a new item to a category; returns its assigned id.
    ///
    /// # Errors
    ///
    /// [`SessionError::EmptyName`] or [`SessionError::CategoryNotFound`].
    pub fn add_item(
        &mut self,
        category: &str,
        name: &str,
        kind: ItemKind,
    ) -> Result<String, SessionError> {
        let name = non_empty(name)?;
        let idx = self.category_index(category)?;
        let target = &mut self.config.categories[idx];
        let used: BTreeSet<String> = target.items.iter().map(|i| i.id.clone()).collect();
        let id = slug::assign(name, &used);
        target.items.push(Item {
            id: id.clone(),
            name: name.to_string(),
            kind: clean_kind(kind),
            order: 0,
        });
        self.finish();
        Ok(id)
    }

    /// Remove a category with all its items.
    ///
    /// # Errors
    ///
    /// [`SessionError::CategoryNotFound`].
    pub fn delete_category(&mut self, category: &str) -> Result<Category, SessionError> {
        let idx = self.category_index(category)?;
        let removed = self.config.categories.remove(idx);
        self.finish();
        Ok(removed)
    }

    /// Remove one item.
    ///
    /// # Errors
    ///
    /// [`SessionError::CategoryNotFound`] or [`SessionError::ItemNotFound`].
    pub fn delete_item(&mut self, category: &str, item: &str) -> Result<Item, SessionError> {
        let (ci, ii) = self.item_position(category, item)?;
        let removed = self.config.categories[ci].items.remove(ii);
        self.finish();
        Ok(removed)
    }

    /// Change a category's display name. The id is kept.
    ///
    /// # Errors
    ///
    /// [`SessionError::EmptyName`] or [`SessionError::CategoryNotFound`].
    pub fn rename_category(&mut self, category: &str, name: &str) -> Result<(), SessionError> {
        let name = non_empty(name)?;
        let idx = self.category_index(category)?;
        self.config.categories[idx].name = name.to_string();
        self.finish();
        Ok(())
    }

    /// Change an item's display name. The id is kept.
    ///
    /// # Errors
    ///
    /// [`SessionError::EmptyName`], [`SessionError::CategoryNotFound`] or
    /// [`SessionError::ItemNotFound`].
    pub fn rename_item(&mut self, category: &str, item: &str, name: &str) -> Result<(), SessionError> {
        let name = non_empty(name)?;
        let (ci, ii) = self.item_position(category, item)?;
        self.config.categories[ci].items[ii].name = name.to_string();
        self.finish();
        Ok(())
    }

    /// Replace an item's kind (and suffix).
    ///
    /// # Errors
    ///
    /// [`SessionError::CategoryNotFound`] or [`SessionError::ItemNotFound`].
    pub fn set_item_kind(
        &mut self,
        category: &str,
        item: &str,
        kind: ItemKind,
    ) -> Result<(), SessionError> {
        let (ci, ii) = self.item_position(category, item)?;
        self.config.categories[ci].items[ii].kind = clean_kind(kind);
        self.finish();
        Ok(())
    }

    /// Swap a category with its neighbour (`-1` up, `+1` down).
    ///
    /// Returns `false` at either end of the list.
    ///
    /// # Errors
    ///
    /// [`SessionError::CategoryNotFound`].
    pub fn move_category_by(&mut self, category: &str, delta: isize) -> Result<bool, SessionError> {
        let idx = self.category_index(category)?;
        let moved = reorder::shift_category(&mut self.config, idx, delta);
        self.finish();
        Ok(moved)
    }

    /// Swap an item with its neighbour inside its category.
    ///
    /// # Errors
    ///
    /// [`SessionError::CategoryNotFound`] or [`SessionError::ItemNotFound`].
    pub fn move_item_by(
        &mut self,
        category: &str,
        item: &str,
        delta: isize,
    ) -> Result<bool, SessionError> {
        let (ci, ii) = self.item_position(category, item)?;
        let moved = reorder::shift_item(&mut self.config, ci, ii, delta);
        self.finish();
        Ok(moved)
    }

    /// Move a category to position `to`. Out-of-range targets are a no-op.
    ///
    /// # Errors
    ///
    /// [`SessionError::CategoryNotFound`].
    pub fn drop_category(&mut self, category: &str, to: usize) -> Result<bool, SessionError> {
        let idx = self.category_index(category)?;
        let moved = reorder::move_category(&mut self.config, idx, to);
        self.finish();
        Ok(moved)
    }

    /// Move a category to the last position.
    ///
    /// # Errors
    ///
    /// [`SessionError::CategoryNotFound`].
    pub fn drop_category_at_end(&mut self, category: &str) -> Result<bool, SessionError> {
        let last = self.config.categories.len().saturating_sub(1);
        self.drop_category(category, last)
    }

    /// Move an item into `to_category` at `to` (clamped; past the end appends).
    ///
    /// Returns the moved item's id in its destination, or `None` when nothing
    /// changed. The id differs from `item` only when the destination already
    /// held an item with that id.
    ///
    /// # Errors
    ///
    /// [`SessionError::CategoryNotFound`] for either category or
    /// [`SessionError::ItemNotFound`].
    pub fn drop_item(
        &mut self,
        from_category: &str,
        item: &str,
        to_category: &str,
        to: usize,
    ) -> Result<Option<String>, SessionError> {
        let (fc, fi) = self.item_position(from_category, item)?;
        let tc = self.category_index(to_category)?;
        let remaining = self.config.categories[tc].items.len() - usize::from(fc == tc);
        let at = to.min(remaining);

        let moved = reorder::move_item_across(&mut self.config, fc, fi, tc, to);
        self.finish();
        if !moved {
            return Ok(None);
        }
        Ok(self.config.categories[tc].items.get(at).map(|i| i.id.clone()))
    }

    /// Append an item to the end of `to_category`.
    ///
    /// # Errors
    ///
    /// Same as [`EditSession::drop_item`].
    pub fn drop_item_at_end(
        &mut self,
        from_category: &str,
        item: &str,
        to_category: &str,
    ) -> Result<Option<String>, SessionError> {
        let tc = self.category_index(to_category)?;
        let end = self.config.categories[tc].items.len();
        self.drop_item(from_category, item, to_category, end)
    }

    fn category_index(&self, category: &str) -> Result<usize, SessionError> {
        self.config
            .category_index(category)
            .ok_or_else(|| SessionError::CategoryNotFound(category.to_string()))
    }

    fn item_position(&self, category: &str, item: &str) -> Result<(usize, usize), SessionError> {
        let ci = self.category_index(category)?;
        let ii = self.config.categories[ci]
            .item_index(item)
            .ok_or_else(|| SessionError::ItemNotFound {
                category: category.to_string(),
                item: item.to_string(),
            })?;
        Ok((ci, ii))
    }

    fn finish(&mut self) {
        self.config.recompute_order();
    }
}

fn clean_kind(kind: ItemKind) -> ItemKind {
    match kind {
        ItemKind::Count { suffix } => ItemKind::Count {
            suffix: suffix.filter(|s| !s.trim().is_empty()),
        },
        other => other,
    }
}

fn non_empty(name: &str) -> Result<&str, SessionError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(SessionError::EmptyName)
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session() -> EditSession {
        EditSession::from_document(&json!({
            "categories": [
                { "id": "work", "name": "Work", "items": [
                    { "id": "a", "name": "A" },
                    { "id": "b", "name": "B" },
                    { "id": "c", "name": "C" }
                ] },
                { "id": "study", "name": "Study", "items": [ { "id": "duo", "name": "Duo", "type": "streak" } ] },
                { "id": "house", "name": "House", "items": [] }
            ]
        }))
    }

    fn category_ids(s: &EditSession) -> Vec<&str> {
        s.config().categories.iter().map(|c| c.id.as_str()).collect()
    }

    fn item_ids<'a>(s: &'a EditSession, category: &str) -> Vec<&'a str> {
        s.config()
            .category(category)
            .map(|c| c.items.iter().map(|i| i.id.as_str()).collect())
            .unwrap_or_default()
    }

    fn assert_orders_contiguous(s: &EditSession) {
        for (pos, c) in (1_u32..).zip(&s.config().categories) {
            assert_eq!(c.order, pos, "category {}", c.id);
            for (ipos, i) in (1_u32..).zip(&c.items) {
                assert_eq!(i.order, ipos, "item {}/{}", c.id, i.id);
            }
        }
    }

    #[test]
    fn add_category_assigns_unique_slug() {
        let mut s = session();
        assert_eq!(s.add_category("Side Project").expect("add"), "side-project");
        assert_eq!(s.add_category("Work").expect("add"), "work-1");
        assert_eq!(category_ids(&s), ["work", "study", "house", "side-project", "work-1"]);
        assert_orders_contiguous(&s);
    }

    #[test]
    fn add_item_scopes_ids_to_siblings() {
        let mut s = session();
        assert_eq!(s.add_item("work", "a", ItemKind::Check).expect("add"), "a-1");
        assert_eq!(s.add_item("house", "a", ItemKind::Streak).expect("add"), "a");
        assert_eq!(item_ids(&s, "work"), ["a", "b", "c", "a-1"]);
        assert_orders_contiguous(&s);
    }

    #[test]
    fn empty_names_are_rejected() {
        let mut s = session();
        let before = s.clone();
        assert_eq!(s.add_category("   "), Err(SessionError::EmptyName));
        assert_eq!(s.add_item("work", "", ItemKind::Check), Err(SessionError::EmptyName));
        assert_eq!(s.rename_category("work", " "), Err(SessionError::EmptyName));
        assert_eq!(s, before);
    }

    #[test]
    fn unknown_targets_are_reported() {
        let mut s = session();
        assert_eq!(
            s.delete_category("nope").map(|_| ()),
            Err(SessionError::CategoryNotFound("nope".into()))
        );
        assert!(matches!(
            s.delete_item("work", "zzz"),
            Err(SessionError::ItemNotFound { .. })
        ));
    }

    #[test]
    fn delete_recomputes_order() {
        let mut s = session();
        s.delete_item("work", "a").expect("delete");
        s.delete_category("study").expect("delete");
        assert_eq!(item_ids(&s, "work"), ["b", "c"]);
        assert_eq!(category_ids(&s), ["work", "house"]);
        assert_orders_contiguous(&s);
    }

    #[test]
    fn rename_keeps_ids() {
        let mut s = session();
        s.rename_item("work", "a", "  Alpha ").expect("rename");
        s.rename_category("study", "勉強").expect("rename");
        let work = s.config().category("work").expect("work");
        assert_eq!(work.item("a").map(|i| i.name.as_str()), Some("Alpha"));
        assert_eq!(s.config().category("study").map(|c| c.name.as_str()), Some("勉強"));
    }

    #[test]
    fn set_kind_drops_empty_suffix() {
        let mut s = session();
        s.set_item_kind("work", "b", ItemKind::Count { suffix: Some(String::new()) })
            .expect("set");
        let work = s.config().category("work").expect("work");
        assert_eq!(work.item("b").map(|i| &i.kind), Some(&ItemKind::Count { suffix: None }));
    }

    #[test]
    fn neighbour_moves() {
        let mut s = session();
        assert!(s.move_category_by("study", -1).expect("move"));
        assert_eq!(category_ids(&s), ["study", "work", "house"]);
        assert!(!s.move_category_by("study", -1).expect("move"));
        assert!(s.move_item_by("work", "a", 1).expect("move"));
        assert_eq!(item_ids(&s, "work"), ["b", "a", "c"]);
        assert_orders_contiguous(&s);
    }

    #[test]
    fn drag_category_moves() {
        let mut s = session();
        assert!(s.drop_category("work", 2).expect("drop"));
        assert_eq!(category_ids(&s), ["study", "house", "work"]);
        assert!(s.drop_category_at_end("study").expect("drop"));
        assert_eq!(category_ids(&s), ["house", "work", "study"]);
        assert!(!s.drop_category("house", 9).expect("drop"));
        assert_orders_contiguous(&s);
    }

    #[test]
    fn drag_item_across_categories() {
        let mut s = session();
        assert_eq!(s.drop_item("work", "a", "study", 0).expect("drop").as_deref(), Some("a"));
        assert_eq!(item_ids(&s, "study"), ["a", "duo"]);
        assert_eq!(s.drop_item_at_end("work", "c", "house").expect("drop").as_deref(), Some("c"));
        assert_eq!(item_ids(&s, "house"), ["c"]);
        assert_eq!(item_ids(&s, "work"), ["b"]);
        assert_eq!(s.config().item_count(), 4);
        assert_orders_contiguous(&s);
    }

    #[test]
    fn drag_item_onto_clashing_id_keeps_resident_id() {
        let mut s = EditSession::from_document(&json!({
            "categories": [
                { "id": "work", "name": "Work", "items": [ { "id": "note", "name": "Moved" } ] },
                { "id": "social", "name": "Social", "items": [ { "id": "note", "name": "note投稿" } ] }
            ]
        }));

        let landed = s.drop_item("work", "note", "social", 0).expect("drop");
        assert_eq!(landed.as_deref(), Some("moved"));
        assert_eq!(item_ids(&s, "social"), ["moved", "note"]);
        let resident = s.config().category("social").and_then(|c| c.item("note"));
        assert_eq!(resident.map(|i| i.name.as_str()), Some("note投稿"));

        // Reloading the saved shape changes nothing.
        let reloaded = EditSession::from_document(&serde_json::to_value(s.config()).expect("serialize"));
        assert_eq!(reloaded, s);
        assert_orders_contiguous(&s);
    }

    #[test]
    fn drag_item_to_same_spot_reports_none() {
        let mut s = session();
        assert_eq!(s.drop_item("work", "c", "work", 2).expect("drop"), None);
        assert_eq!(s.drop_item_at_end("work", "c", "work").expect("drop"), None);
        assert_eq!(item_ids(&s, "work"), ["a", "b", "c"]);
    }

    #[test]
    fn malformed_text_is_reported() {
        let err = EditSession::from_text("{ \"categories\": [").expect_err("must fail");
        assert!(matches!(err, SessionError::Malformed { line: 1, .. }));
        assert_eq!(err.code(), ErrorCode::MalformedDocument);
    }

    #[test]
    fn pretty_reindents_with_two_spaces() {
        let out = pretty(r#"{"categories":[{"id":"a"}]}"#).expect("pretty");
        assert_eq!(out, "{\n  \"categories\": [\n    {\n      \"id\": \"a\"\n    }\n  ]\n}");
    }
}

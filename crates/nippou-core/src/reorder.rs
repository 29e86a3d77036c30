//! Positional moves on a live [`Configuration`].
//!
//! These operations only change sequence positions. They leave `order`
//! fields stale on purpose so the same primitives serve both neighbour swaps
//! and drag-style absolute moves; callers finish with
//! [`Configuration::recompute_order`].
//!
//! Every operation returns `true` when it changed something. Out-of-range
//! indices are a silent no-op. No item is ever duplicated or dropped.

use crate::model::Configuration;
use crate::normalize::ITEM_FALLBACK_LABEL;
use crate::slug;
use std::collections::BTreeSet;

/// Remove the element at `from` and reinsert it at `to`.
///
/// No-op when `from == to` or either index is out of bounds.
pub fn move_in<T>(seq: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from == to || from >= seq.len() || to >= seq.len() {
        return false;
    }
    let moved = seq.remove(from);
    seq.insert(to, moved);
    true
}

/// Swap the element at `index` with its neighbour `index + delta`.
pub fn shift_in<T>(seq: &mut [T], index: usize, delta: isize) -> bool {
    let Some(target) = index.checked_add_signed(delta) else {
        return false;
    };
    if delta == 0 || index >= seq.len() || target >= seq.len() {
        return false;
    }
    seq.swap(index, target);
    true
}

/// Move a category to an absolute position.
pub fn move_category(config: &mut Configuration, from: usize, to: usize) -> bool {
    move_in(&mut config.categories, from, to)
}

/// Move a category one step up (`-1`) or down (`+1`).
pub fn shift_category(config: &mut Configuration, index: usize, delta: isize) -> bool {
    shift_in(&mut config.categories, index, delta)
}

/// Move an item to an absolute position inside its own category.
pub fn move_item(config: &mut Configuration, category: usize, from: usize, to: usize) -> bool {
    config
        .categories
        .get_mut(category)
        .is_some_and(|c| move_in(&mut c.items, from, to))
}

/// Move an item one step up or down inside its own category.
pub fn shift_item(config: &mut Configuration, category: usize, index: usize, delta: isize) -> bool {
    config
        .categories
        .get_mut(category)
        .is_some_and(|c| shift_in(&mut c.items, index, delta))
}

/// Move an item into another category (or the same one) at `to_item`.
///
/// The destination index is clamped to the destination length after the
/// removal, so any index at or past the end appends. The item keeps its id
/// unless the destination category already holds that id, in which case it
/// gets a fresh one derived from its name. Items already in the destination
/// never change id.
pub fn move_item_across(
    config: &mut Configuration,
    from_category: usize,
    from_item: usize,
    to_category: usize,
    to_item: usize,
) -> bool {
    let categories = &mut config.categories;
    if to_category >= categories.len() {
        return false;
    }
    let Some(source) = categories.get_mut(from_category) else {
        return false;
    };
    if from_item >= source.items.len() {
        return false;
    }
    if from_category == to_category && from_item == to_item {
        return false;
    }

    let mut moved = source.items.remove(from_item);
    let destination = &mut categories[to_category].items;
    if from_category != to_category && destination.iter().any(|i| i.id == moved.id) {
        let used: BTreeSet<String> = destination.iter().map(|i| i.id.clone()).collect();
        let label = if moved.name.trim().is_empty() {
            ITEM_FALLBACK_LABEL
        } else {
            moved.name.as_str()
        };
        moved.id = slug::assign(label, &used);
    }
    let at = to_item.min(destination.len());
    destination.insert(at, moved);
    from_category != to_category || at != from_item
}

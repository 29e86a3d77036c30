//! Identifier assignment for categories and items.
//!
//! Ids are URL-safe slugs derived from the display label. Uniqueness is only
//! ever checked against siblings: category ids against other category ids,
//! item ids against the other items of the same category.

use std::collections::BTreeSet;

/// Maximum length of the slug body (collision suffixes may extend past it).
pub const MAX_SLUG_LEN: usize = 32;

/// Placeholder used when a label slugs down to nothing.
pub const EMPTY_SLUG: &str = "x";

/// Derive the bare slug for `label`, without any collision handling.
///
/// Lower-cases, trims, turns whitespace runs into a single `-`, drops every
/// character outside `[a-z0-9-]`, and truncates to [`MAX_SLUG_LEN`].
#[must_use]
pub fn slugify(label: &str) -> String {
    let lowered = label.trim().to_lowercase();

    let mut hyphenated = String::with_capacity(lowered.len());
    let mut in_space = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_space {
                hyphenated.push('-');
            }
            in_space = true;
        } else {
            hyphenated.push(c);
            in_space = false;
        }
    }

    let mut slug: String = hyphenated
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();
    // ASCII only at this point, byte truncation is safe.
    slug.truncate(MAX_SLUG_LEN);

    if slug.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        slug
    }
}

/// Assign a collision-free id for `label` among the sibling ids in `used`.
///
/// Returns the bare slug when free, otherwise the first of `slug-1`,
/// `slug-2`, ... that is not in `used`.
#[must_use]
pub fn assign(label: &str, used: &BTreeSet<String>) -> String {
    let base = slugify(label);
    if !used.contains(&base) {
        return base;
    }

    (1_u64..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !used.contains(candidate))
        .unwrap_or(base)
}

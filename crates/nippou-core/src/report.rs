//! Daily report text generation.
//!
//! [`generate`] is a pure function of the configuration, the date, the
//! free-text note, and the answers. Output layout:
//!
//! ```text
//! 1月15日（月）            <- only when a date is given
//!                          <- blank line before each non-empty category
//! 🗂️ お仕事
//! ◯バックオフィス業務E
//!
//! 今日の一言：...          <- only when the trimmed note is non-empty
//!
//! 今日もお疲れ様でした🍻
//! ```
//!
//! Categories with no checked items contribute nothing, not even a header.

use crate::answers::{Answer, Answers};
use crate::model::{Configuration, Item, ItemKind};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub const BULLET: &str = "◯";
pub const FALLBACK_ICON: &str = "🗂️";
pub const ONE_LINER_PREFIX: &str = "今日の一言：";
pub const SIGN_OFF: &str = "今日もお疲れ様でした🍻";

/// Count items carrying exactly this label always render with
/// [`SOCIAL_POST_UNIT`], whatever suffix is configured. Matched on the
/// label, not the id.
pub const SOCIAL_POST_LABEL: &str = "X投稿";
pub const SOCIAL_POST_UNIT: &str = "ポスト";

const WEEKDAYS: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

const CATEGORY_ICONS: &[(&str, &str)] = &[
    ("courses", "🎓"),
    ("social", "📣"),
    ("study", "📚"),
    ("exercise", "🏃"),
    ("house", "🏠"),
];

/// How the first report line renders the date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    /// `1月15日（月）`
    #[default]
    Weekday,
    /// `2024/01/15`
    Slash,
}

impl DateStyle {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weekday => "weekday",
            Self::Slash => "slash",
        }
    }

    /// Render `date` in this style.
    #[must_use]
    pub fn format(self, date: NaiveDate) -> String {
        match self {
            Self::Weekday => {
                let weekday = WEEKDAYS[date.weekday().num_days_from_sunday() as usize];
                format!("{}月{}日（{weekday}）", date.month(), date.day())
            }
            Self::Slash => date.format("%Y/%m/%d").to_string(),
        }
    }
}

impl fmt::Display for DateStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekday" => Ok(Self::Weekday),
            "slash" => Ok(Self::Slash),
            other => Err(format!("invalid date style '{other}' (expected weekday or slash)")),
        }
    }
}

/// Header icon for a category id.
#[must_use]
pub fn icon_for(category_id: &str) -> &'static str {
    CATEGORY_ICONS
        .iter()
        .find(|(id, _)| *id == category_id)
        .map_or(FALLBACK_ICON, |(_, icon)| *icon)
}

/// Render one checked item as a report line.
///
/// A count or streak answered without a value renders as the bare label,
/// the social-post label included (no unit without a number).
#[must_use]
pub fn item_line(item: &Item, answer: &Answer) -> String {
    let label = &item.name;
    match (&item.kind, answer.value) {
        (ItemKind::Count { .. }, Some(n)) if label == SOCIAL_POST_LABEL => {
            format!("{BULLET}{SOCIAL_POST_LABEL}{n}{SOCIAL_POST_UNIT}")
        }
        (ItemKind::Count { suffix }, Some(n)) => {
            format!("{BULLET}{label}{n}{}", suffix.as_deref().unwrap_or_default())
        }
        (ItemKind::Streak, Some(n)) => format!("{BULLET}{label}（{n}日目）"),
        (ItemKind::Check | ItemKind::Count { .. } | ItemKind::Streak, _) => {
            format!("{BULLET}{label}")
        }
    }
}

/// Build the report text.
///
/// Identical inputs always produce byte-identical output.
#[must_use]
pub fn generate(
    config: &Configuration,
    date: Option<NaiveDate>,
    note: &str,
    answers: &Answers,
    style: DateStyle,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    if let Some(date) = date {
        lines.push(style.format(date));
    }

    for category in &config.categories {
        let section: Vec<String> = category
            .items
            .iter()
            .filter_map(|item| {
                answers
                    .get(&category.id, &item.id)
                    .filter(|a| a.checked)
                    .map(|a| item_line(item, a))
            })
            .collect();

        if section.is_empty() {
            continue;
        }

        lines.push(String::new());
        lines.push(format!("{} {}", icon_for(&category.id), category.name));
        lines.extend(section);
    }

    let note = note.trim();
    if !note.is_empty() {
        lines.push(String::new());
        lines.push(format!("{ONE_LINER_PREFIX}{note}"));
    }

    lines.push(String::new());
    lines.push(SIGN_OFF.to_string());

    lines.join("\n")
}

pub mod category;
pub mod completions;
pub mod generate;
pub mod item;
pub mod load;
pub mod pretty;
pub mod save;
pub mod show;

use crate::output::{CliError, OutputMode, fail, render};
use nippou_core::session::SessionError;
use serde::Serialize;
use std::io::Write;

/// Result of one admin edit on the working buffer.
#[derive(Debug, Serialize)]
pub struct EditOutcome {
    pub ok: bool,
    pub action: &'static str,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    /// `false` when the edit was a no-op (e.g. moving the first entry up).
    pub changed: bool,
    pub message: String,
}

impl EditOutcome {
    pub fn new(action: &'static str, category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            action,
            category: category.into(),
            item: None,
            changed: true,
            message: message.into(),
        }
    }

    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.item = Some(item.into());
        self
    }

    pub const fn changed(mut self, changed: bool) -> Self {
        self.changed = changed;
        self
    }
}

pub fn render_outcome(output: OutputMode, outcome: &EditOutcome) -> anyhow::Result<()> {
    render(output, outcome, |o, w| {
        let mark = if o.changed { "✓" } else { "·" };
        match output {
            OutputMode::Pretty => writeln!(w, "{mark} {}", o.message),
            _ => writeln!(w, "{}", o.message),
        }
    })
}

/// Unwrap a session result or render it as the command failure.
pub fn session_result<T>(output: OutputMode, result: Result<T, SessionError>) -> anyhow::Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) => fail(output, &CliError::from(&err)),
    }
}

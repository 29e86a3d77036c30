//! `nippou save` and `nippou reset`: authenticated writes to the store.

use crate::output::{CliError, OutputMode, fail, render};
use crate::workspace;
use clap::Args;
use nippou_core::defaults;
use nippou_core::normalize::normalize;
use nippou_core::session::{self, EditSession};
use nippou_core::store;
use serde_json::json;
use std::io::Write;
use std::path::Path;
use tracing::info;

#[derive(Args, Debug)]
pub struct TokenArgs {
    /// Admin token (falls back to NIPPOU_TOKEN).
    #[arg(long)]
    pub token: Option<String>,
}

pub fn run_save(args: &TokenArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let token = workspace::require_token(args.token.as_deref(), output)?;
    let text = workspace::read_working_text(project_root, output)?;

    let raw = match session::parse_document(&text) {
        Ok(raw) => raw,
        Err(err) => return fail(output, &CliError::from(&err)),
    };
    if let Err(err) = store::validate_payload(&raw) {
        return fail(output, &CliError::from(&err));
    }

    let config = normalize(&raw);
    let document = serde_json::to_value(&config)?;

    let settings = workspace::settings(project_root, output)?;
    let target = workspace::open_store(project_root, &settings, output)?;
    if let Err(err) = target.save(&document, &token) {
        return fail(output, &CliError::from(&err));
    }
    info!(categories = config.categories.len(), "saved working copy to store");

    let value = json!({
        "ok": true,
        "categories": config.categories.len(),
        "items": config.item_count(),
    });
    render(output, &value, |_, w| {
        writeln!(
            w,
            "✓ Saved {} categories, {} items",
            config.categories.len(),
            config.item_count()
        )
    })
}

pub fn run_reset(args: &TokenArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let token = workspace::require_token(args.token.as_deref(), output)?;
    let settings = workspace::settings(project_root, output)?;
    let target = workspace::open_store(project_root, &settings, output)?;

    if let Err(err) = target.reset(&token) {
        return fail(output, &CliError::from(&err));
    }

    // Mirror the store so the next edit starts from what was just written.
    let path = workspace::write_session(project_root, &EditSession::new(defaults::config()))?;
    info!(path = %path.display(), "reset store and working copy to defaults");

    let value = json!({ "ok": true, "reset": true, "working": path.display().to_string() });
    render(output, &value, |_, w| {
        writeln!(w, "✓ Store reset to bundled defaults (working copy refreshed)")
    })
}

//! `nippou load`: fetch the configuration into the working buffer.

use crate::output::{OutputMode, pretty_kv, render_mode, render_warning};
use crate::workspace;
use clap::Args;
use nippou_core::session::EditSession;
use nippou_core::store::{LoadSource, Loaded};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::info;

#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Start from the bundled defaults instead of the store.
    #[arg(long)]
    pub defaults: bool,
}

#[derive(Debug, Serialize)]
struct LoadReport {
    source: LoadSource,
    categories: usize,
    items: usize,
    working: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
}

pub fn run_load(args: &LoadArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let loaded = if args.defaults {
        Loaded::defaults()
    } else {
        let settings = workspace::settings(project_root, output)?;
        let store = workspace::open_store(project_root, &settings, output)?;
        store.load()
    };

    if let Some(warning) = &loaded.warning {
        render_warning(output, &format!("{warning}; using bundled defaults"))?;
    }

    let session = EditSession::from_document(&loaded.document);
    let path = workspace::write_session(project_root, &session)?;
    info!(source = loaded.source.as_str(), path = %path.display(), "wrote working copy");

    let report = LoadReport {
        source: loaded.source,
        categories: session.config().categories.len(),
        items: session.config().item_count(),
        working: path.display().to_string(),
        warning: loaded.warning,
    };

    render_mode(
        output,
        &report,
        |r, w| {
            writeln!(
                w,
                "source={} categories={} items={}",
                r.source.as_str(),
                r.categories,
                r.items
            )
        },
        |r, w| {
            writeln!(w, "✓ Loaded configuration into working copy")?;
            pretty_kv(w, "Source", r.source.as_str())?;
            pretty_kv(w, "Categories", r.categories.to_string())?;
            pretty_kv(w, "Items", r.items.to_string())?;
            pretty_kv(w, "Working", &r.working)
        },
    )
}

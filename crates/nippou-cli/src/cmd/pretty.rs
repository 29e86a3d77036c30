//! `nippou pretty`: re-indent the working buffer in place.

use crate::output::{CliError, OutputMode, fail, render};
use crate::workspace;
use nippou_core::session;
use serde_json::json;
use std::io::Write;
use std::path::Path;

pub fn run_pretty(output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let text = workspace::read_working_text(project_root, output)?;

    // Malformed text is reported and the file is left exactly as it was.
    let formatted = match session::pretty(&text) {
        Ok(formatted) => formatted,
        Err(err) => return fail(output, &CliError::from(&err)),
    };

    let path = workspace::write_working_text(project_root, &formatted)?;
    let value = json!({ "ok": true, "working": path.display().to_string() });
    render(output, &value, |_, w| {
        writeln!(w, "✓ Reformatted {}", path.display())
    })
}

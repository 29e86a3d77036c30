//! `nippou generate`: build the daily report text.

use crate::output::{CliError, OutputMode, fail, render, render_warning};
use crate::validate;
use crate::workspace;
use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Args;
use nippou_core::answers::Answers;
use nippou_core::error::ErrorCode;
use nippou_core::model::Configuration;
use nippou_core::report::{self, DateStyle};
use nippou_core::config::Settings;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Report date (YYYY-MM-DD). Omit for a report without a date line.
    #[arg(long, value_parser = validate::parse_date, conflicts_with = "today")]
    pub date: Option<NaiveDate>,

    /// Use today's local date.
    #[arg(long)]
    pub today: bool,

    /// One-line note appended to the report.
    #[arg(long, default_value = "")]
    pub note: String,

    /// Checked item, optionally with a value (repeatable).
    #[arg(long = "check", value_name = "CATEGORY/ITEM[=N]")]
    pub checks: Vec<String>,

    /// JSON answers file; --check entries override it.
    #[arg(long, value_name = "FILE")]
    pub answers: Option<PathBuf>,

    /// Date line style: weekday (1月15日（月）) or slash (2024/01/15).
    #[arg(long, value_name = "STYLE")]
    pub style: Option<DateStyle>,

    /// Use the working copy instead of the store.
    #[arg(long)]
    pub working: bool,
}

#[derive(Debug, Serialize)]
struct GeneratedReport {
    report: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
    source: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unknown_answers: Vec<String>,
}

fn collect_answers(args: &GenerateArgs, output: OutputMode) -> anyhow::Result<Answers> {
    let mut answers = Answers::new();

    if let Some(path) = &args.answers {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let doc: serde_json::Value = match serde_json::from_str(&text) {
            Ok(doc) => doc,
            Err(err) => {
                return fail(
                    output,
                    &CliError::coded(
                        format!("answers file {} is not valid JSON: {err}", path.display()),
                        ErrorCode::InvalidAnswer,
                    ),
                );
            }
        };
        match Answers::from_json(&doc) {
            Ok(from_file) => answers.merge(from_file),
            Err(err) => return fail(output, &CliError::from(&err)),
        }
    }

    match Answers::from_specs(&args.checks) {
        Ok(from_flags) => answers.merge(from_flags),
        Err(err) => return fail(output, &CliError::from(&err)),
    }

    Ok(answers)
}

fn load_config(
    args: &GenerateArgs,
    settings: &Settings,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<(Configuration, &'static str)> {
    if args.working {
        let session = workspace::open_session(project_root, output)?;
        return Ok((session.into_config(), "working"));
    }

    let store = workspace::open_store(project_root, settings, output)?;
    let loaded = store.load();
    if let Some(warning) = &loaded.warning {
        render_warning(output, &format!("{warning}; using bundled defaults"))?;
    }
    Ok((loaded.config(), loaded.source.as_str()))
}

pub fn run_generate(args: &GenerateArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let settings = workspace::settings(project_root, output)?;
    let (config, source) = load_config(args, &settings, output, project_root)?;
    let answers = collect_answers(args, output)?;

    let unknown: Vec<String> = answers
        .unknown_keys(&config)
        .into_iter()
        .map(|(category, item)| format!("{category}/{item}"))
        .collect();
    for key in &unknown {
        warn!(answer = %key, "answer does not match any configured item");
        render_warning(output, &format!("ignoring answer for unknown item {key}"))?;
    }

    for (category, item) in answers.ignored_values(&config) {
        warn!(category = %category, item = %item, "value given for a check item");
        render_warning(
            output,
            &format!("ignoring value for check item {category}/{item}"),
        )?;
    }

    let style = args.style.unwrap_or(settings.report.date_style);
    let date = if args.today {
        Some(Local::now().date_naive())
    } else {
        args.date
    };

    let generated = GeneratedReport {
        report: report::generate(&config, date, &args.note, &answers, style),
        date,
        source,
        unknown_answers: unknown,
    };
    render(output, &generated, |g, w| writeln!(w, "{}", g.report))
}

//! Shared output layer for pretty/text/JSON parity across all CLI commands.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format` / hidden `--json` flag
//! 2. `FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 3. `output` key in `.nippou/config.toml` (same values)
//! 4. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.
//!
//! Report text and command results go to stdout; errors and warnings go to
//! stderr so `nippou generate | pbcopy` stays clean.

use clap::ValueEnum;
use nippou_core::answers::AnswerError;
use nippou_core::error::ErrorCode;
use nippou_core::session::SessionError;
use nippou_core::store::StoreError;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 48;

/// Write a horizontal separator used by pretty human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<12} {}", format!("{key}:"), value.as_ref())
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output (sections, visual framing).
    Pretty,
    /// Plain text for scripts and pipes.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    /// Returns `true` if JSON output was requested.
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }

    /// Parse a mode name, case-insensitively. Unknown names yield `None`.
    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "text" => Some(Self::Text),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Core resolution logic, separated from I/O for testability.
fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
    settings_output: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }

    if json_flag {
        return OutputMode::Json;
    }

    if let Some(mode) = format_env.and_then(OutputMode::from_name) {
        return mode;
    }

    if let Some(mode) = settings_output.and_then(OutputMode::from_name) {
        return mode;
    }

    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from CLI flags, environment, settings, and TTY
/// defaults.
pub fn resolve_output_mode(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    settings_output: Option<&str>,
) -> OutputMode {
    let env_val = std::env::var("FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(
        format_flag,
        json_flag,
        env_val.as_deref(),
        settings_output,
        is_tty,
    )
}

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code (e.g. "E3001", "invalid_position").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    /// Create an error with a suggestion and error code.
    pub fn with_details(
        message: impl Into<String>,
        suggestion: impl Into<String>,
        error_code: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            suggestion: Some(suggestion.into()),
            error_code: Some(error_code.into()),
        }
    }

    /// Create an error carrying a core [`ErrorCode`] and its hint.
    pub fn coded(message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            suggestion: code.hint().map(ToString::to_string),
            error_code: Some(code.code().to_string()),
        }
    }
}

impl From<&SessionError> for CliError {
    fn from(err: &SessionError) -> Self {
        Self::coded(err.to_string(), err.code())
    }
}

impl From<&StoreError> for CliError {
    fn from(err: &StoreError) -> Self {
        Self::coded(err.to_string(), err.code())
    }
}

impl From<&AnswerError> for CliError {
    fn from(err: &AnswerError) -> Self {
        Self::coded(err.to_string(), err.code())
    }
}

/// Render a serializable value to stdout in the requested format.
///
/// In JSON mode, the value is serialized with `serde_json`. In pretty/text mode,
/// the provided `human_fn` closure is called to produce text output.
pub fn render<T: Serialize>(
    mode: OutputMode,
    value: &T,
    human_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            human_fn(value, &mut out)?;
        }
    }
    Ok(())
}

/// Render a serializable value with explicit pretty/text renderers.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, &mut out)?,
        OutputMode::Pretty => pretty_fn(value, &mut out)?,
    }
    Ok(())
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "error": error,
            });
            serde_json::to_writer_pretty(&mut out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            writeln!(out, "error: {}", error.message)?;
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

/// Render `error` and turn it into the command's failure.
pub fn fail<T>(mode: OutputMode, error: &CliError) -> anyhow::Result<T> {
    render_error(mode, error)?;
    anyhow::bail!("{}", error.message)
}

/// Print a non-fatal warning to stderr (human modes only).
pub fn render_warning(mode: OutputMode, message: &str) -> io::Result<()> {
    if mode.is_json() {
        return Ok(());
    }
    let stderr = io::stderr();
    let mut out = stderr.lock();
    writeln!(out, "warning: {message}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_mode_is_json() {
        assert!(OutputMode::Json.is_json());
        assert!(!OutputMode::Pretty.is_json());
        assert!(!OutputMode::Text.is_json());
    }

    #[test]
    fn resolve_format_flag_wins_over_json_and_env() {
        let mode = resolve_output_mode_inner(Some(OutputMode::Text), true, Some("pretty"), None, true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn resolve_json_flag_wins_over_env() {
        let mode = resolve_output_mode_inner(None, true, Some("pretty"), Some("text"), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn resolve_format_env_case_insensitive() {
        let mode = resolve_output_mode_inner(None, false, Some("JSON"), None, true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn resolve_format_env_unknown_falls_through_to_tty() {
        let mode_tty = resolve_output_mode_inner(None, false, Some("fancy"), None, true);
        assert_eq!(mode_tty, OutputMode::Pretty);
        let mode_pipe = resolve_output_mode_inner(None, false, Some("fancy"), None, false);
        assert_eq!(mode_pipe, OutputMode::Text);
    }

    #[test]
    fn resolve_default_no_tty_is_text() {
        let mode = resolve_output_mode_inner(None, false, None, None, false);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn resolve_env_wins_over_settings() {
        let mode = resolve_output_mode_inner(None, false, Some("text"), Some("json"), true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn resolve_settings_output_wins_over_tty() {
        let mode = resolve_output_mode_inner(None, false, None, Some("json"), true);
        assert_eq!(mode, OutputMode::Json);
        let mode = resolve_output_mode_inner(None, false, None, Some(" Pretty "), false);
        assert_eq!(mode, OutputMode::Pretty);
    }

    #[test]
    fn resolve_unknown_settings_output_falls_through() {
        let mode = resolve_output_mode_inner(None, false, Some("fancy"), Some("loud"), false);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn cli_error_with_details() {
        let err = CliError::with_details("bad position", "use 1 or more", "invalid_position");
        assert_eq!(err.message, "bad position");
        assert_eq!(err.suggestion.as_deref(), Some("use 1 or more"));
        assert_eq!(err.error_code.as_deref(), Some("invalid_position"));
    }

    #[test]
    fn cli_error_from_store_error() {
        let err = CliError::from(&StoreError::Unauthorized);
        assert_eq!(err.error_code.as_deref(), Some("E3001"));
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn cli_error_from_session_error() {
        let err = CliError::from(&SessionError::CategoryNotFound("gym".into()));
        assert!(err.message.contains("gym"));
        assert_eq!(err.error_code.as_deref(), Some("E5001"));
    }

    #[test]
    fn empty_name_has_no_suggestion() {
        let err = CliError::from(&SessionError::EmptyName);
        assert!(err.suggestion.is_none());
        let json = serde_json::to_value(&err).expect("serialize");
        assert!(json.get("suggestion").is_none());
    }

    #[test]
    fn render_error_json() {
        let err = CliError::with_details("bad input", "try again", "bad_input");
        assert!(render_error(OutputMode::Json, &err).is_ok());
    }

    #[test]
    fn fail_returns_error_with_message() {
        let err = CliError::coded("no working copy", ErrorCode::WorkingCopyMissing);
        let result: anyhow::Result<()> = fail(OutputMode::Text, &err);
        assert_eq!(
            result.expect_err("must fail").to_string(),
            "no working copy"
        );
    }

    #[test]
    fn render_text_calls_human_fn() {
        #[derive(Serialize)]
        struct TestData {
            val: u32,
        }
        let mut called = false;
        let result = render(OutputMode::Text, &TestData { val: 9 }, |d, w| {
            called = true;
            writeln!(w, "val={}", d.val)
        });
        assert!(result.is_ok());
        assert!(called);
    }
}

//! Per-project state under `.nippou/`: the working buffer, settings, and the
//! configured store.

use crate::output::{CliError, OutputMode, fail};
use crate::remote::HttpStore;
use anyhow::Context;
use nippou_core::config::{self, PROJECT_DIR, Settings, StoreBackend};
use nippou_core::error::ErrorCode;
use nippou_core::session::EditSession;
use nippou_core::store::{ConfigStore, FileStore, write_atomic};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const WORKING_FILE: &str = "working.json";
pub const TOKEN_ENV: &str = "NIPPOU_TOKEN";
pub const ADMIN_TOKEN_ENV: &str = "NIPPOU_ADMIN_TOKEN";

pub fn working_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_DIR).join(WORKING_FILE)
}

/// Settings for the project with environment overrides applied.
pub fn settings(project_root: &Path, output: OutputMode) -> anyhow::Result<Settings> {
    let mut settings = match config::load_settings(project_root) {
        Ok(settings) => settings,
        Err(err) => {
            return fail(
                output,
                &CliError::coded(format!("{err:#}"), ErrorCode::SettingsParseError),
            );
        }
    };
    settings.apply_env(|key| std::env::var(key).ok());
    Ok(settings)
}

/// Open the store the settings point at.
pub fn open_store(
    project_root: &Path,
    settings: &Settings,
    output: OutputMode,
) -> anyhow::Result<Box<dyn ConfigStore>> {
    match settings.store.backend {
        StoreBackend::File => {
            let path = settings.store.file_path(project_root);
            debug!(path = %path.display(), "using file store");
            let admin = env_non_empty(ADMIN_TOKEN_ENV);
            Ok(Box::new(FileStore::new(path, admin)))
        }
        StoreBackend::Http => {
            let Some(url) = settings.store.url.as_deref() else {
                return fail(
                    output,
                    &CliError::with_details(
                        "http store selected but no url configured",
                        "set [store] url in .nippou/config.toml or NIPPOU_STORE_URL",
                        "missing_store_url",
                    ),
                );
            };
            debug!(url, "using http store");
            Ok(Box::new(HttpStore::new(
                url,
                Duration::from_secs(settings.store.timeout_secs),
            )))
        }
    }
}

/// Token from `--token`, else `NIPPOU_TOKEN`.
pub fn require_token(flag: Option<&str>, output: OutputMode) -> anyhow::Result<String> {
    let token = flag
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
        .or_else(|| env_non_empty(TOKEN_ENV));
    match token {
        Some(token) => Ok(token),
        None => fail(
            output,
            &CliError::coded("admin token not provided", ErrorCode::MissingToken),
        ),
    }
}

/// Raw text of the working buffer.
pub fn read_working_text(project_root: &Path, output: OutputMode) -> anyhow::Result<String> {
    let path = working_path(project_root);
    if !path.exists() {
        return fail(
            output,
            &CliError::coded(
                format!("no working copy at {}", path.display()),
                ErrorCode::WorkingCopyMissing,
            ),
        );
    }
    std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Working buffer parsed and normalized into an edit session.
pub fn open_session(project_root: &Path, output: OutputMode) -> anyhow::Result<EditSession> {
    let text = read_working_text(project_root, output)?;
    match EditSession::from_text(&text) {
        Ok(session) => Ok(session),
        Err(err) => fail(output, &CliError::from(&err)),
    }
}

/// Write text to the working buffer.
pub fn write_working_text(project_root: &Path, text: &str) -> anyhow::Result<PathBuf> {
    let path = working_path(project_root);
    let mut contents = text.to_string();
    if !contents.ends_with('\n') {
        contents.push('\n');
    }
    write_atomic(&path, &contents).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Persist a session's configuration to the working buffer.
pub fn write_session(project_root: &Path, session: &EditSession) -> anyhow::Result<PathBuf> {
    let text = session
        .to_pretty_json()
        .context("failed to serialize working configuration")?;
    write_working_text(project_root, &text)
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

use crate::report::DateStyle;
use crate::store::STORE_KEY;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Per-project state directory (working buffer, settings, file store).
pub const PROJECT_DIR: &str = ".nippou";

pub const STORE_URL_ENV: &str = "NIPPOU_STORE_URL";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub report: ReportSettings,
    /// Output mode (`pretty`, `text`, `json`) used when neither `--format`
    /// nor `FORMAT` is given.
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    File,
    Http,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: StoreBackend,
    /// File store location; relative paths resolve against the project root.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Base URL of the remote store (`{url}/api/config`).
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: None,
            url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl StoreSettings {
    /// Resolved file-store path for a project.
    #[must_use]
    pub fn file_path(&self, project_root: &Path) -> PathBuf {
        match &self.path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => project_root.join(path),
            None => project_root.join(PROJECT_DIR).join(STORE_KEY),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default)]
    pub date_style: DateStyle,
}

impl Settings {
    /// Apply environment overrides through `lookup` (normally `std::env::var`).
    ///
    /// A non-empty store URL forces the http backend.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(STORE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.store.backend = StoreBackend::Http;
            self.store.url = Some(url.trim().to_string());
        }
    }
}

pub fn project_settings_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_DIR).join("config.toml")
}

pub fn user_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("nippou/config.toml"))
}

/// Load settings from the project file, else the user file, else defaults.
///
/// # Errors
///
/// Returns an error when the chosen file cannot be read or parsed.
pub fn load_settings(project_root: &Path) -> Result<Settings> {
    let project = project_settings_path(project_root);
    if project.exists() {
        return load_settings_file(&project);
    }

    match user_settings_path() {
        Some(user) if user.exists() => load_settings_file(&user),
        _ => Ok(Settings::default()),
    }
}

/// Parse one settings file.
///
/// # Errors
///
/// Returns an error when the file cannot be read or is not valid TOML.
pub fn load_settings_file(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<Settings>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

const fn default_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_project_settings_use_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let project = project_settings_path(dir.path());
        assert!(!project.exists());
        let cfg = Settings::default();
        assert_eq!(cfg.store.backend, StoreBackend::File);
        assert_eq!(cfg.store.timeout_secs, 10);
        assert_eq!(cfg.report.date_style, DateStyle::Weekday);
    }

    #[test]
    fn project_settings_parse() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = project_settings_path(dir.path());
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(
            &path,
            r#"
output = "json"

[store]
backend = "http"
url = "https://nippou.example.com"
timeout_secs = 3

[report]
date_style = "slash"
"#,
        )
        .expect("write");

        let cfg = load_settings(dir.path()).expect("load");
        assert_eq!(cfg.output.as_deref(), Some("json"));
        assert_eq!(cfg.store.backend, StoreBackend::Http);
        assert_eq!(cfg.store.url.as_deref(), Some("https://nippou.example.com"));
        assert_eq!(cfg.store.timeout_secs, 3);
        assert_eq!(cfg.report.date_style, DateStyle::Slash);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[store\nbackend = ").expect("write");
        let err = load_settings_file(&path).expect_err("must fail");
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let parsed = toml::from_str::<Settings>("[store]\nbackend = \"s3\"\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn file_path_resolution() {
        let root = Path::new("/work/proj");
        let mut store = StoreSettings::default();
        assert_eq!(
            store.file_path(root),
            PathBuf::from("/work/proj/.nippou/nippou-config.json")
        );
        store.path = Some(PathBuf::from("data/config.json"));
        assert_eq!(store.file_path(root), PathBuf::from("/work/proj/data/config.json"));
        store.path = Some(PathBuf::from("/srv/nippou.json"));
        assert_eq!(store.file_path(root), PathBuf::from("/srv/nippou.json"));
    }

    #[test]
    fn store_url_env_forces_http() {
        let mut cfg = Settings::default();
        cfg.apply_env(|key| (key == STORE_URL_ENV).then(|| " https://x.test ".to_string()));
        assert_eq!(cfg.store.backend, StoreBackend::Http);
        assert_eq!(cfg.store.url.as_deref(), Some("https://x.test"));

        let mut untouched = Settings::default();
        untouched.apply_env(|_| Some("   ".to_string()));
        assert_eq!(untouched.store.backend, StoreBackend::File);
    }
}

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;

pub const SETTINGS_FILE: &str = "admin.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data_dir: PathBuf,
    /// Per-fetch timeout; `0` disables it.
    pub fetch_timeout_ms: u64,
    pub log_filter: String,
    pub default_office: Option<i64>,
    pub show_inactive: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            fetch_timeout_ms: 30_000,
            log_filter: "info".into(),
            default_office: None,
            show_inactive: false,
        }
    }
}

impl Settings {
    pub fn fetch_timeout(&self) -> Option<Duration> {
        (self.fetch_timeout_ms > 0).then(|| Duration::from_millis(self.fetch_timeout_ms))
    }
}

/// Defaults, then `admin.toml` (or `path`), then environment overrides.
/// Runs before logging is set up, so bad values are errors, not warnings.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let path = path.unwrap_or_else(|| Path::new(SETTINGS_FILE));
    let settings = read_settings_file(path)?;
    apply_env(settings, |name| std::env::var(name).ok())
}

fn read_settings_file(path: &Path) -> anyhow::Result<Settings> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            return Ok(Settings::default());
        }
        Err(error) => {
            return Err(error)
                .with_context(|| format!("failed to read settings file '{}'", path.display()));
        }
    };
    toml::from_str(&raw).with_context(|| format!("invalid settings file '{}'", path.display()))
}

fn apply_env(
    mut settings: Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    if let Some(v) = lookup("ADMIN_DATA_DIR") {
        settings.data_dir = PathBuf::from(v);
    }
    if let Some(v) = lookup("APP__DATA_DIR") {
        settings.data_dir = PathBuf::from(v);
    }

    if let Some(v) = lookup("APP__FETCH_TIMEOUT_MS") {
        settings.fetch_timeout_ms = v
            .parse()
            .with_context(|| format!("APP__FETCH_TIMEOUT_MS must be milliseconds, got '{v}'"))?;
    }

    if let Some(v) = lookup("RUST_LOG") {
        settings.log_filter = v;
    }
    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    if let Some(v) = lookup("APP__DEFAULT_OFFICE") {
        let office = v
            .parse()
            .with_context(|| format!("APP__DEFAULT_OFFICE must be an office id, got '{v}'"))?;
        settings.default_office = Some(office);
    }

    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

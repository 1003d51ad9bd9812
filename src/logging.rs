//! File-backed `tracing` setup. The terminal belongs to the UI, so log output
//! never goes to stdout or stderr.

use crate::model::LogConfig;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "SIGNUP_TUI_LOG";
const DEFAULT_FILE: &str = "signup-tui.log";

pub fn log_path(cfg: &LogConfig, base_dir: Option<&Path>) -> PathBuf {
    match &cfg.file {
        Some(f) => {
            let p = PathBuf::from(f);
            if p.is_absolute() {
                p
            } else {
                base_dir.map(|d| d.join(&p)).unwrap_or(p)
            }
        }
        None => std::env::temp_dir().join(DEFAULT_FILE),
    }
}

pub fn filter_directive(cfg: &LogConfig, env_value: Option<String>) -> String {
    env_value
        .filter(|s| !s.trim().is_empty())
        .or_else(|| cfg.level.clone())
        .unwrap_or_else(|| "info".to_string())
}

/// Installs the global subscriber. Returns the log file path.
pub fn setup_logging(cfg: &LogConfig, base_dir: Option<&Path>) -> Result<PathBuf> {
    let path = log_path(cfg, base_dir);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {path:?}"))?;
    let directive = filter_directive(cfg, std::env::var(LOG_ENV).ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .ok();
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_file_resolves_against_config_dir() {
        let cfg = LogConfig {
            file: Some("logs/app.log".into()),
            level: None,
        };
        let p = log_path(&cfg, Some(Path::new("/etc/signup")));
        assert_eq!(p, PathBuf::from("/etc/signup/logs/app.log"));
    }

    #[test]
    fn missing_file_falls_back_to_temp_dir() {
        let p = log_path(&LogConfig::default(), None);
        assert!(p.ends_with(DEFAULT_FILE));
    }

    #[test]
    fn env_overrides_config_level() {
        let cfg = LogConfig {
            file: None,
            level: Some("debug".into()),
        };
        assert_eq!(filter_directive(&cfg, Some("warn".into())), "warn");
        assert_eq!(filter_directive(&cfg, Some("  ".into())), "debug");
        assert_eq!(filter_directive(&LogConfig::default(), None), "info");
    }
}

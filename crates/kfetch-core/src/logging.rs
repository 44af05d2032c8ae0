//! tracing setup for the `kfetch` binary.
//!
//! Events go to `$XDG_STATE_HOME/kfetch/kfetch.log` when that file can be
//! opened, and to stderr otherwise. `RUST_LOG` overrides the default filter.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,kfetch=debug,kfetch_core=debug";
const LOG_FILE: &str = "kfetch.log";

/// Where [`init`] ended up sending events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

/// Installs the global subscriber. Never fails: an unusable log file means stderr.
pub fn init() -> LogTarget {
    let filter = filter_from(std::env::var("RUST_LOG").ok().as_deref());
    match log_file_path().and_then(|path| open_log_file(&path).map(|f| (path, f))) {
        Ok((path, file)) => {
            let installed = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
                .is_ok();
            if installed {
                tracing::info!("kfetch logging to {}", path.display());
            }
            LogTarget::File(path)
        }
        Err(err) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .try_init();
            tracing::debug!("log file unavailable ({:#}); logging to stderr", err);
            LogTarget::Stderr
        }
    }
}

fn log_file_path() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix("kfetch")?;
    Ok(dirs.place_state_file(LOG_FILE)?)
}

/// Opens `path` for appending, creating missing parent directories.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))
}

/// A directive string that does not parse falls back to the default filter.
fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
        assert_eq!(filter_from(None).to_string(), EnvFilter::new(DEFAULT_FILTER).to_string());
    }

    #[test]
    fn bad_directives_fall_back_to_default() {
        let filter = filter_from(Some("kfetch=[[nope"));
        assert_eq!(filter.to_string(), EnvFilter::new(DEFAULT_FILTER).to_string());
        assert_eq!(filter_from(Some("warn")).to_string(), "warn");
    }

    #[test]
    fn log_file_is_appended_and_parents_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("kfetch").join(LOG_FILE);
        open_log_file(&path).unwrap().write_all(b"one\n").unwrap();
        open_log_file(&path).unwrap().write_all(b"two\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn unopenable_log_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open_log_file(dir.path()).is_err());
    }
}

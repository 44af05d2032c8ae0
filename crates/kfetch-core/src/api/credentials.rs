//! Kaggle API credentials: environment first, then `kaggle.json`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::error::FetchError;

pub const USERNAME_VAR: &str = "KAGGLE_USERNAME";
pub const KEY_VAR: &str = "KAGGLE_KEY";
pub const CONFIG_DIR_VAR: &str = "KAGGLE_CONFIG_DIR";

#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Loads credentials from the process environment and home directory.
    pub fn load() -> Result<Self> {
        Self::from_sources(|name| std::env::var(name).ok(), dirs::home_dir())
    }

    /// Resolution with injectable lookups: `env` reads a variable, `home` is the user's home.
    pub fn from_sources<F>(env: F, home: Option<PathBuf>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let (Some(username), Some(key)) = (env(USERNAME_VAR), env(KEY_VAR)) {
            tracing::debug!("using Kaggle credentials from environment for {}", username);
            return Ok(Self { username, key });
        }

        let path = match env(CONFIG_DIR_VAR) {
            Some(dir) => PathBuf::from(dir).join("kaggle.json"),
            None => home
                .unwrap_or_default()
                .join(".kaggle")
                .join("kaggle.json"),
        };
        if !path.is_file() {
            return Err(FetchError::MissingCredentials(path.display().to_string()).into());
        }
        let data = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        let creds: Credentials =
            serde_json::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
        tracing::debug!("using Kaggle credentials from {}", path.display());
        Ok(creds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn environment_wins() {
        let home = tempfile::tempdir().unwrap();
        let creds = Credentials::from_sources(
            env_of(&[(USERNAME_VAR, "alice"), (KEY_VAR, "s3cret")]),
            Some(home.path().to_path_buf()),
        )
        .unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.key, "s3cret");
    }

    #[test]
    fn reads_kaggle_json_from_home() {
        let home = tempfile::tempdir().unwrap();
        let dir = home.path().join(".kaggle");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("kaggle.json"), r#"{"username":"bob","key":"abc"}"#).unwrap();
        let creds = Credentials::from_sources(env_of(&[]), Some(home.path().to_path_buf())).unwrap();
        assert_eq!(creds.username, "bob");
        assert_eq!(creds.key, "abc");
    }

    #[test]
    fn config_dir_override() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("kaggle.json"), r#"{"username":"carol","key":"k"}"#).unwrap();
        let config_dir = dir.path().to_string_lossy().into_owned();
        let creds =
            Credentials::from_sources(env_of(&[(CONFIG_DIR_VAR, config_dir.as_str())]), None)
                .unwrap();
        assert_eq!(creds.username, "carol");
    }

    #[test]
    fn username_alone_is_not_enough() {
        let home = tempfile::tempdir().unwrap();
        let err = Credentials::from_sources(
            env_of(&[(USERNAME_VAR, "alice")]),
            Some(home.path().to_path_buf()),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FetchError>(),
            Some(FetchError::MissingCredentials(_))
        ));
    }

    #[test]
    fn debug_redacts_key() {
        let creds = Credentials {
            username: "alice".into(),
            key: "s3cret".into(),
        };
        let s = format!("{:?}", creds);
        assert!(s.contains("alice"));
        assert!(!s.contains("s3cret"));
    }
}

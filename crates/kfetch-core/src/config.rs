use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::fetch::FetchLayout;

pub const DEFAULT_API_BASE_URL: &str = "https://www.kaggle.com/api/v1";

/// Global configuration loaded from `~/.config/kfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KfetchConfig {
    /// Root of the Kaggle REST API (no trailing slash).
    pub api_base_url: String,
    /// Directory, relative to the working directory, that receives data files.
    pub input_dir: String,
    /// File name of the converted notebook script.
    pub script_name: String,
    /// Seconds allowed for establishing a connection.
    pub connect_timeout_secs: u64,
    /// Upper bound for a whole transfer; `None` = no limit.
    #[serde(default)]
    pub transfer_timeout_secs: Option<u64>,
}

impl Default for KfetchConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            input_dir: "input".to_string(),
            script_name: "nb.py".to_string(),
            connect_timeout_secs: 30,
            transfer_timeout_secs: Some(3600),
        }
    }
}

impl KfetchConfig {
    /// On-disk layout used by the fetch routines.
    pub fn layout(&self) -> FetchLayout {
        FetchLayout {
            input_dir: PathBuf::from(&self.input_dir),
            script_name: self.script_name.clone(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("kfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<KfetchConfig> {
    load_or_init_at(&config_path()?)
}

/// Same as [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<KfetchConfig> {
    if !path.exists() {
        let default_cfg = KfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: KfetchConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

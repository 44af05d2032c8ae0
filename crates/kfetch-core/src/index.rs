//! Notebook index: a YAML list describing test notebooks and their data.
//!
//! ```yaml
//! - url: https://www.kaggle.com/alice/titanic-eda
//!   data: https://www.kaggle.com/c/titanic
//! - url: https://www.kaggle.com/bob/cities
//!   data: https://www.kaggle.com/bob/world-cities
//! - url: https://www.kaggle.com/carol/houses
//!   data: https://www.kaggle.com/c/house-prices
//!   files: train.csv
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::FetchError;
use crate::target::{self, DownloadTarget, FileSelection};

/// One row of the index file as written on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEntry {
    /// Notebook (kernel) URL.
    pub url: String,
    /// Competition or dataset URL providing the notebook's input.
    pub data: String,
    #[serde(default)]
    pub files: Option<FileSelection>,
}

/// An index row with its download target resolved.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub url: String,
    pub data: String,
    pub files: Option<FileSelection>,
    pub target: DownloadTarget,
}

impl IndexEntry {
    /// `owner/slug` of the notebook, suitable for `kernel_pull`.
    pub fn kernel_path(&self) -> Option<String> {
        let url = url::Url::parse(&self.url).ok()?;
        let segments: Vec<&str> = url.path().split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [.., owner, slug] => Some(format!("{owner}/{slug}")),
            _ => None,
        }
    }
}

pub fn parse_index(yaml: &str) -> Result<Vec<RawEntry>> {
    Ok(serde_yaml::from_str(yaml)?)
}

pub fn load_index(path: &Path) -> Result<Vec<RawEntry>> {
    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_index(&data).with_context(|| format!("parse index {}", path.display()))
}

/// Keys entries by the notebook name (last segment of `url`) and resolves their targets.
///
/// A later entry with the same name replaces an earlier one.
pub fn process_index(entries: Vec<RawEntry>) -> Result<BTreeMap<String, IndexEntry>> {
    let mut out = BTreeMap::new();
    for raw in entries {
        let key = target::last_segment(&raw.url)?;
        let target = DownloadTarget::from_data(&raw.data, raw.files.as_ref())
            .with_context(|| format!("index entry {}", key))?;
        let entry = IndexEntry {
            url: raw.url,
            data: raw.data,
            files: raw.files,
            target,
        };
        if out.insert(key.clone(), entry).is_some() {
            tracing::warn!("duplicate index entry {}; keeping the last one", key);
        }
    }
    Ok(out)
}

/// Looks up `name` in a processed index.
pub fn lookup<'a>(index: &'a BTreeMap<String, IndexEntry>, name: &str) -> Result<&'a IndexEntry> {
    index.get(name).ok_or_else(|| {
        FetchError::UnknownIndexEntry {
            name: name.to_string(),
            available: index.keys().cloned().collect(),
        }
        .into()
    })
}

//! Download targets and the name derivation rules behind them.
//!
//! A data identifier is path-like: either a full Kaggle URL
//! (`https://www.kaggle.com/c/titanic`) or a bare path (`c/titanic`,
//! `owner/some-dataset`). Competitions are recognised by a literal `c`
//! segment and named by their last segment; everything else is a dataset
//! named `owner/dataset`.

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

use crate::api::KaggleApi;
use crate::error::FetchError;
use crate::fetch::{self, FetchLayout};

/// Path segment that marks competition URLs.
pub const COMPETITION_SEGMENT: &str = "c";

/// The `files` field of an index entry: one name or a list of names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FileSelection {
    One(String),
    Many(Vec<String>),
}

impl FileSelection {
    /// Collapses the selection to at most one file name.
    ///
    /// Errors with [`FetchError::MultipleFilesUnsupported`] when more than one is given.
    pub fn single(&self) -> Result<Option<&str>, FetchError> {
        match self {
            FileSelection::One(name) if name.is_empty() => Ok(None),
            FileSelection::One(name) => Ok(Some(name.as_str())),
            FileSelection::Many(names) => match names.as_slice() {
                [] => Ok(None),
                [name] => Ok(Some(name.as_str())),
                _ => Err(FetchError::MultipleFilesUnsupported(names.clone())),
            },
        }
    }
}

/// What to download for a notebook's input data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadTarget {
    Competition { name: String, file: Option<String> },
    Dataset { name: String },
}

impl DownloadTarget {
    /// Derives the target from a data identifier and an optional file selection.
    pub fn from_data(data: &str, files: Option<&FileSelection>) -> Result<Self, FetchError> {
        let segments = path_segments(data)?;
        let file = match files {
            Some(sel) => sel.single()?.map(str::to_string),
            None => None,
        };

        if segments.iter().any(|s| s == COMPETITION_SEGMENT) {
            // Non-empty: `segments` contains at least the marker.
            let name = segments[segments.len() - 1].clone();
            return Ok(DownloadTarget::Competition { name, file });
        }

        let [.., owner, slug] = segments.as_slice() else {
            return Err(FetchError::InvalidIdentifier(
                data.to_string(),
                "dataset identifiers need owner/dataset",
            ));
        };
        let name = format!("{owner}/{slug}");
        if let Some(file) = file {
            return Err(FetchError::DatasetFileFilter { dataset: name, file });
        }
        Ok(DownloadTarget::Dataset { name })
    }

    pub fn name(&self) -> &str {
        match self {
            DownloadTarget::Competition { name, .. } | DownloadTarget::Dataset { name } => name,
        }
    }

    /// Runs the matching download routine in `workdir`.
    pub fn run(&self, api: &dyn KaggleApi, workdir: &Path, layout: &FetchLayout) -> Result<()> {
        tracing::info!("download target: {:?}", self);
        match self {
            DownloadTarget::Competition { name, file } => {
                fetch::download_from_competition(api, workdir, layout, name, file.as_deref())
            }
            DownloadTarget::Dataset { name } => {
                fetch::download_from_dataset(api, workdir, layout, name)
            }
        }
    }
}

/// Final path segment of a path-like identifier (`user/my-notebook` -> `my-notebook`).
pub fn last_segment(identifier: &str) -> Result<String, FetchError> {
    path_segments(identifier)?
        .pop()
        .ok_or_else(|| FetchError::InvalidIdentifier(identifier.to_string(), "no path segments"))
}

/// Non-empty path segments of a URL's path or of a bare path.
fn path_segments(identifier: &str) -> Result<Vec<String>, FetchError> {
    let segments: Vec<String> = if identifier.contains("://") {
        let parsed = url::Url::parse(identifier)
            .map_err(|_| FetchError::InvalidIdentifier(identifier.to_string(), "not a valid URL"))?;
        parsed
            .path()
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        identifier
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    };
    if segments.is_empty() {
        return Err(FetchError::InvalidIdentifier(
            identifier.to_string(),
            "no path segments",
        ));
    }
    Ok(segments)
}

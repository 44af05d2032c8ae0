//! Kaggle API boundary.
//!
//! The fetch routines depend only on [`KaggleApi`]; [`KaggleClient`] is the
//! real implementation over HTTPS and tests substitute their own.

mod client;
pub mod credentials;

pub use client::{kernel_extension, KaggleClient};
pub use credentials::Credentials;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The three Kaggle operations kfetch needs.
pub trait KaggleApi {
    /// Pulls the source of `kernel` (`owner/slug`) into directory `path`.
    /// Returns the path of the written source file.
    fn kernel_pull(&self, kernel: &str, path: &Path) -> Result<PathBuf>;

    /// Downloads all files of `competition` as `<competition>.zip`, or only
    /// `file_name` when given, into `path`. Returns the written file.
    fn competition_download(
        &self,
        competition: &str,
        file_name: Option<&str>,
        path: &Path,
    ) -> Result<PathBuf>;

    /// Downloads `dataset` (`owner/slug`) into `path`, extracting it there when `unzip` is set.
    fn dataset_download(&self, dataset: &str, path: &Path, unzip: bool) -> Result<()>;
}

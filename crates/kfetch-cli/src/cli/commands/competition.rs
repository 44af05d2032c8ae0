//! `kfetch competition <name> [--file FILE]` – download competition data.

use anyhow::Result;
use kfetch_core::api::KaggleApi;
use kfetch_core::error::FetchError;
use kfetch_core::fetch::{self, FetchLayout};
use std::path::Path;

/// Reduces repeated `--file` values to at most one.
pub fn single_file(mut files: Vec<String>) -> Result<Option<String>, FetchError> {
    match files.len() {
        0 => Ok(None),
        1 => Ok(files.pop()),
        _ => Err(FetchError::MultipleFilesUnsupported(files)),
    }
}

pub fn run_competition(
    api: &dyn KaggleApi,
    workdir: &Path,
    layout: &FetchLayout,
    name: &str,
    file: Option<&str>,
) -> Result<()> {
    fetch::download_from_competition(api, workdir, layout, name, file)?;
    println!(
        "Competition {} ready in {}",
        name,
        workdir.join(&layout.input_dir).display()
    );
    Ok(())
}

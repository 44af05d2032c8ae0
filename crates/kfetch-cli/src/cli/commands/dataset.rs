//! `kfetch dataset <owner/slug>` – download and unzip a dataset.

use anyhow::Result;
use kfetch_core::api::KaggleApi;
use kfetch_core::fetch::{self, FetchLayout};
use std::path::Path;

pub fn run_dataset(
    api: &dyn KaggleApi,
    workdir: &Path,
    layout: &FetchLayout,
    name: &str,
) -> Result<()> {
    fetch::download_from_dataset(api, workdir, layout, name)?;
    println!(
        "Dataset {} ready in {}",
        name,
        workdir.join(&layout.input_dir).display()
    );
    Ok(())
}

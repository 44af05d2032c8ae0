//! `kfetch index <index.yaml> <notebook>` – download the data a listed notebook needs.

use anyhow::Result;
use kfetch_core::api::KaggleApi;
use kfetch_core::fetch::FetchLayout;
use kfetch_core::index;
use std::path::Path;

pub fn run_index(
    api: &dyn KaggleApi,
    workdir: &Path,
    layout: &FetchLayout,
    index_path: &Path,
    notebook: &str,
) -> Result<()> {
    let entries = index::process_index(index::load_index(index_path)?)?;
    let entry = index::lookup(&entries, notebook)?;
    println!("Downloading data for {} from {}", notebook, entry.data);
    entry.target.run(api, workdir, layout)?;
    Ok(())
}

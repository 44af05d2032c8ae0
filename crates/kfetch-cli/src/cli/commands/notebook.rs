//! `kfetch notebook <kernel_path>` – pull a kernel and convert it to nb.py.

use anyhow::Result;
use kfetch_core::api::KaggleApi;
use kfetch_core::fetch::{self, FetchLayout};
use std::path::Path;

pub fn run_notebook(
    api: &dyn KaggleApi,
    workdir: &Path,
    layout: &FetchLayout,
    kernel_path: &str,
) -> Result<()> {
    println!("Downloading notebook...");
    let pulled = fetch::pull_notebook(api, workdir, kernel_path)?;
    println!("Converting to .py...");
    let py = fetch::convert_notebook(&pulled, layout)?;
    println!("Wrote {}", py.display());
    Ok(())
}

//! Download routines behind the `notebook`, `competition` and `dataset` commands.
//!
//! Every routine works relative to an explicit `workdir` rather than the
//! process cwd. Failures propagate as-is; nothing already written is
//! rolled back.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::KaggleApi;
use crate::archive;
use crate::error::FetchError;
use crate::notebook;
use crate::target;

/// Names of the directories and files the routines produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchLayout {
    /// Directory (relative to the workdir) receiving data files.
    pub input_dir: PathBuf,
    /// File name of the converted notebook, inside the kernel directory.
    pub script_name: String,
}

impl Default for FetchLayout {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            script_name: "nb.py".to_string(),
        }
    }
}

/// A kernel pulled to disk, not yet converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PulledNotebook {
    /// `<workdir>/<name>`
    pub dir: PathBuf,
    /// `<workdir>/<name>/<name>.ipynb`
    pub ipynb: PathBuf,
}

/// Pulls `kernel_path` into `<workdir>/<name>/`, `name` being its last segment.
pub fn pull_notebook(
    api: &dyn KaggleApi,
    workdir: &Path,
    kernel_path: &str,
) -> Result<PulledNotebook> {
    let name = target::last_segment(kernel_path)?;
    let dir = workdir.join(&name);
    api.kernel_pull(kernel_path, &dir)
        .with_context(|| format!("pull kernel {}", kernel_path))?;
    let ipynb = dir.join(format!("{name}.ipynb"));
    Ok(PulledNotebook { dir, ipynb })
}

/// Writes the percent-format script next to the pulled notebook and deletes
/// the notebook. Returns the script path.
pub fn convert_notebook(pulled: &PulledNotebook, layout: &FetchLayout) -> Result<PathBuf> {
    let py = pulled.dir.join(&layout.script_name);
    let nb = notebook::read_notebook(&pulled.ipynb)?;
    notebook::write_percent_script(&nb, &py)?;
    fs::remove_file(&pulled.ipynb)
        .with_context(|| format!("remove {}", pulled.ipynb.display()))?;

    tracing::info!("converted {} to {}", pulled.ipynb.display(), py.display());
    Ok(py)
}

/// [`pull_notebook`] followed by [`convert_notebook`].
pub fn fetch_notebook(
    api: &dyn KaggleApi,
    workdir: &Path,
    layout: &FetchLayout,
    kernel_path: &str,
) -> Result<PathBuf> {
    let pulled = pull_notebook(api, workdir, kernel_path)?;
    convert_notebook(&pulled, layout)
}

/// Downloads competition data into `<workdir>/<input_dir>`.
///
/// Without `file`, the `<name>.zip` archive is extracted (and left in
/// place). With `file`, the input directory is created (it must not already
/// exist) and the single downloaded file is moved into it.
pub fn download_from_competition(
    api: &dyn KaggleApi,
    workdir: &Path,
    layout: &FetchLayout,
    name: &str,
    file: Option<&str>,
) -> Result<()> {
    api.competition_download(name, file, workdir)
        .with_context(|| format!("download competition {}", name))?;

    let input = workdir.join(&layout.input_dir);
    match file {
        None => {
            let archive_path = workdir.join(format!("{name}.zip"));
            if !archive_path.is_file() {
                return Err(FetchError::MissingArchive(archive_path.display().to_string()).into());
            }
            let n = archive::extract_zip(&archive_path, &input)?;
            tracing::info!("extracted {} files into {}", n, input.display());
        }
        Some(file) => {
            fs::create_dir(&input).with_context(|| format!("create {}", input.display()))?;
            let from = workdir.join(file);
            let to = input.join(file);
            fs::rename(&from, &to)
                .with_context(|| format!("move {} to {}", from.display(), to.display()))?;
            tracing::info!("moved {} to {}", from.display(), to.display());
        }
    }
    Ok(())
}

/// Downloads `name` (`owner/dataset`) and lets the client unzip it into `<workdir>/<input_dir>`.
pub fn download_from_dataset(
    api: &dyn KaggleApi,
    workdir: &Path,
    layout: &FetchLayout,
    name: &str,
) -> Result<()> {
    let input = workdir.join(&layout.input_dir);
    api.dataset_download(name, &input, true)
        .with_context(|| format!("download dataset {}", name))?;
    tracing::info!("dataset {} ready in {}", name, input.display());
    Ok(())
}

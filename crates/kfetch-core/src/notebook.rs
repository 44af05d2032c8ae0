//! Notebook reading (`.ipynb`, nbformat 4) and percent-script rendering.
//!
//! Percent scripts mark each cell with a `# %%` line. Markdown and raw cells
//! are kept as comments so the result is a valid Python script, with a
//! commented YAML header holding the kernelspec.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CELL_MARKER: &str = "# %%";

#[derive(Debug, Clone, Deserialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,
    #[serde(default)]
    pub metadata: NotebookMetadata,
    #[serde(default)]
    pub nbformat: u32,
    #[serde(default)]
    pub nbformat_minor: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotebookMetadata {
    #[serde(default)]
    pub kernelspec: Option<KernelSpec>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KernelSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// YAML document carried, commented out, at the top of the script.
#[derive(Serialize)]
struct Header<'a> {
    jupyter: JupyterHeader<'a>,
}

#[derive(Serialize)]
struct JupyterHeader<'a> {
    kernelspec: &'a KernelSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Code,
    Markdown,
    Raw,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cell {
    pub cell_type: CellType,
    #[serde(default)]
    pub source: Source,
}

/// Cell source: nbformat allows either one string or a list of lines.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Source {
    Text(String),
    Lines(Vec<String>),
}

impl Default for Source {
    fn default() -> Self {
        Source::Text(String::new())
    }
}

impl Source {
    pub fn text(&self) -> String {
        match self {
            Source::Text(s) => s.clone(),
            Source::Lines(lines) => lines.concat(),
        }
    }
}

pub fn read_notebook(path: &Path) -> Result<Notebook> {
    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_notebook(&data).with_context(|| format!("parse notebook {}", path.display()))
}

pub fn parse_notebook(json: &str) -> Result<Notebook> {
    let nb: Notebook = serde_json::from_str(json)?;
    if nb.nbformat != 0 && nb.nbformat < 4 {
        tracing::warn!("nbformat {} is older than 4; cells may be missing", nb.nbformat);
    }
    Ok(nb)
}

/// Renders `nb` in the percent-script format.
pub fn to_percent_script(nb: &Notebook) -> Result<String> {
    let mut blocks: Vec<String> = Vec::with_capacity(nb.cells.len() + 1);

    if let Some(spec) = &nb.metadata.kernelspec {
        blocks.push(header(spec)?);
    }

    for cell in &nb.cells {
        let source = cell.source.text();
        let source = source.trim_end_matches('\n');
        let mut block = String::new();
        match cell.cell_type {
            CellType::Code => {
                block.push_str(CELL_MARKER);
                for line in source.lines() {
                    block.push('\n');
                    if is_magic(line) {
                        block.push_str("# ");
                    }
                    block.push_str(line);
                }
            }
            CellType::Markdown => {
                block.push_str(CELL_MARKER);
                block.push_str(" [markdown]");
                push_commented(&mut block, source);
            }
            CellType::Raw => {
                block.push_str(CELL_MARKER);
                block.push_str(" [raw]");
                push_commented(&mut block, source);
            }
        }
        blocks.push(block);
    }

    let mut out = blocks.join("\n\n");
    out.push('\n');
    Ok(out)
}

pub fn write_percent_script(nb: &Notebook, path: &Path) -> Result<()> {
    let script = to_percent_script(nb)?;
    fs::write(path, script).with_context(|| format!("write {}", path.display()))
}

/// Every line of the serialized YAML is commented, so no value can leak into the script body.
fn header(spec: &KernelSpec) -> Result<String> {
    let yaml = serde_yaml::to_string(&Header {
        jupyter: JupyterHeader { kernelspec: spec },
    })
    .context("serialize notebook header")?;
    let mut block = String::from("# ---");
    push_commented(&mut block, yaml.trim_end_matches('\n'));
    block.push_str("\n# ---");
    Ok(block)
}

fn push_commented(block: &mut String, source: &str) {
    for line in source.lines() {
        block.push('\n');
        if line.is_empty() {
            block.push('#');
        } else {
            block.push_str("# ");
            block.push_str(line);
        }
    }
}

/// IPython magics and shell escapes are not valid Python; they get commented out.
fn is_magic(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with('%') || t.starts_with('!')
}

//! CLI for kfetch: download Kaggle notebooks and their data for integration tests.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use kfetch_core::api::KaggleClient;
use kfetch_core::config;
use std::path::PathBuf;

use commands::{run_competition, run_dataset, run_index, run_notebook};

/// Top-level CLI for kfetch.
#[derive(Debug, Parser)]
#[command(name = "kfetch")]
#[command(about = "Download Kaggle notebooks and data for integration testing", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download a notebook kernel and convert it to a percent-format script.
    Notebook {
        /// Kernel path, e.g. `owner/notebook-slug`.
        kernel_path: String,
    },

    /// Download competition files into ./input.
    Competition {
        /// Competition slug, e.g. `titanic`.
        name: String,

        /// Download only this file instead of the whole archive. Only one is supported.
        #[arg(long = "file", value_name = "FILE")]
        files: Vec<String>,
    },

    /// Download a dataset and unzip it into ./input.
    Dataset {
        /// Dataset reference, e.g. `owner/dataset-slug`.
        name: String,
    },

    /// Download the data for a notebook listed in a YAML index.
    Index {
        /// Path to the index file.
        path: PathBuf,

        /// Notebook name (last segment of its URL).
        notebook: String,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let layout = cfg.layout();
        let workdir = std::env::current_dir()?;

        match cli.command {
            CliCommand::Notebook { kernel_path } => {
                let api = KaggleClient::from_config(&cfg)?;
                run_notebook(&api, &workdir, &layout, &kernel_path)?;
            }
            CliCommand::Competition { name, files } => {
                // Rejected before the client (and its credentials) is touched.
                let file = commands::single_file(files)?;
                let api = KaggleClient::from_config(&cfg)?;
                run_competition(&api, &workdir, &layout, &name, file.as_deref())?;
            }
            CliCommand::Dataset { name } => {
                let api = KaggleClient::from_config(&cfg)?;
                run_dataset(&api, &workdir, &layout, &name)?;
            }
            CliCommand::Index { path, notebook } => {
                let api = KaggleClient::from_config(&cfg)?;
                run_index(&api, &workdir, &layout, &path, &notebook)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;

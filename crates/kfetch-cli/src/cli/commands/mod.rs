//! CLI command handlers, one per subcommand.

mod competition;
mod dataset;
mod index;
mod notebook;

pub use competition::{run_competition, single_file};
pub use dataset::run_dataset;
pub use index::run_index;
pub use notebook::run_notebook;

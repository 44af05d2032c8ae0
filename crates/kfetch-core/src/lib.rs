pub mod config;
pub mod error;
pub mod logging;

pub mod api;
pub mod archive;
pub mod fetch;
pub mod index;
pub mod notebook;
pub mod target;

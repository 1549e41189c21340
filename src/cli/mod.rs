//! CLI module
//!
//! Command-line interface over the content API.
//!
//! # Commands
//!
//! - `health` - Probe the server
//! - `get` - Get a document or a single type
//! - `list` - List documents, optionally every page
//! - `create` / `update` / `delete` - Write documents
//! - `upload` - Upload files to the media library
//! - `params` - Print the bracketed query parameters of a JSON value

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, ReadArgs};
pub use runner::Runner;

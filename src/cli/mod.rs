//! # CLI Module
//!
//! Command-line front end of the generator.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! ```bash
//! hanamigen generate --input-file openapi.yaml --app-name Bookshelf --output-dir app
//! ```
//!
//! Options:
//! - `--input-file <FILE>` (alias `--spec`) - OpenAPI document (required)
//! - `--app-name <NAME>` - Ruby application module (default: `HanamiApp`)
//! - `--output-dir <DIR>` - Output root (default: `gen`)
//! - `--config <FILE>` - `hanamigen.toml`; auto-detected next to the spec otherwise
//! - `--templates <DIR>` - Template overrides, matched by file name
//! - `--dry-run` - Print what would be written or skipped
//!
//! ### `inspect`
//!
//! Print the operations the generator would use:
//!
//! ```bash
//! hanamigen inspect --input-file openapi.yaml
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use hanamigen::cli::{Cli, run_cli};
//! use clap::Parser;
//!
//! run_cli(Cli::parse())?;
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{format_operations, run_cli, Cli, Commands};

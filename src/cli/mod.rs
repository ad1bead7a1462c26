//! # Command-Line Interface
//!
//! A terminal host for the manifest trees.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `tree <PATH>` | One axis, fully expanded (or to `--depth`) |
//! | `summary <PATH>` | Counts and the top level of every axis |
//! | `invalid <PATH>` | Documents that are not valid manifests |
//! | `follow` | Active document paths from stdin, trees redrawn per change |
//!
//! `PATH` may be a single YAML file or a directory searched recursively.
//!
//! ## Output Formats
//!
//! All commands support the `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output:
//! ```bash
//! mtree --verbose tree ./deploy --axis labels
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod view;
mod follow;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};

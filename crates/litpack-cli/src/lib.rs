//! litpack command-line interface.
//!
//! - [`cli`] - argument definitions
//! - `commands` - `transform`, `emit` and `variant`
//! - [`error`] - CLI errors and their miette rendering
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status messages on stderr

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result};

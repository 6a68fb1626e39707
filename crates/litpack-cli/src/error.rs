//! Error handling for the litpack CLI.
//!
//! Library errors already carry miette codes and help text; [`cli_error_to_miette`]
//! keeps them and wraps everything else in a plain report.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Litpack(#[from] litpack::Error),

    #[error(transparent)]
    Config(#[from] litpack_config::ConfigError),

    #[error(transparent)]
    Bundler(#[from] litpack_bundler::Error),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Convert a CLI error into a miette report.
pub fn cli_error_to_miette(err: CliError) -> miette::Report {
    match err {
        CliError::Litpack(e) => miette::Report::new(e),
        CliError::Bundler(e) => miette::Report::new(e),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        CliError::FileNotFound(path) => miette::miette!(
            help = "Check the path, or pass --cwd to change the project root",
            "File not found: {}",
            path.display()
        ),
        other => miette::miette!("{}", other),
    }
}

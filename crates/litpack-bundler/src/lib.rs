//! # litpack-bundler
//!
//! The plugin pipeline at the heart of a litpack build.
//!
//! An external bundler owns module resolution and chunking. This crate owns the
//! hook contract around it: plugins resolve ids, transform module sources one
//! at a time, and run post-emission work once the bundle is on disk.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use litpack_bundler::{
//!     Bundle, FinishOptions, FsOutputWriter, PluginRegistry, SourceModule,
//!     plugins::CompressPlugin,
//! };
//! use litpack_config::CompressConfig;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = PluginRegistry::new();
//! registry.add(CompressPlugin::new(CompressConfig::default())?);
//! let driver = registry.into_driver();
//!
//! let module = driver.transform(SourceModule::new("src/main.js", "export {}"))?;
//!
//! let mut bundle = Bundle::default();
//! bundle.push_entry("main", "main.js", module.code);
//!
//! let report = driver
//!     .finish(Arc::new(bundle), &FinishOptions::write_to("dist"), &FsOutputWriter)
//!     .await?;
//! println!("wrote {} files", report.written.len());
//! # Ok(()) }
//! ```

pub mod barrier;
pub mod diagnostics;
pub mod driver;
pub mod filter;
pub mod manifest;
pub mod module;
pub mod output;
pub mod plugin;
pub mod plugins;
pub mod registry;
pub mod sourcemap;

pub use barrier::{
    StageBarrier, StageGuard, WriteBarrier, WriteSignal, WrittenFiles, output_stages, write_barrier,
};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use driver::{BuildReport, FinishOptions, PluginDriver};
pub use filter::IdFilter;
pub use manifest::{Bundle, BundleManifest, ChunkKind, ManifestEntry, OutputFile};
pub use module::{SourceModule, TransformedModule};
pub use output::{FsOutputWriter, OutputWriter, PrewrittenOutput};
pub use plugin::{
    EmitContext, Plugin, PluginContext, ResolvedId, SharedPlugin, TransformOutput, WriteContext,
};
pub use registry::PluginRegistry;

pub use oxc_sourcemap::SourceMap;

/// A failed `emit_complete` hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookFailure {
    pub plugin: String,
    pub message: String,
}

impl std::fmt::Display for HookFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.plugin, self.message)
    }
}

/// Error types for litpack-bundler operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error from the configuration crate.
    #[error(transparent)]
    Config(#[from] litpack_config::ConfigError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid output path (e.g., directory traversal attempt).
    #[error("Invalid output path: {0}")]
    InvalidOutputPath(String),

    /// File write operation failed.
    #[error("Write failure: {0}")]
    WriteFailure(String),

    /// Output file already exists and overwrite is disabled.
    #[error("Output exists: {0}")]
    OutputExists(String),

    /// A `resolve_id` hook failed.
    #[error("Plugin '{plugin}' failed: {message}")]
    Plugin { plugin: String, message: String },

    /// A `transform` hook failed for one module.
    #[error("Plugin '{plugin}' failed to transform '{id}': {message}")]
    Transform {
        plugin: String,
        id: String,
        message: String,
    },

    /// One or more `emit_complete` hooks failed.
    #[error("{}", format_hook_failures(.0))]
    EmitHooks(Vec<HookFailure>),

    /// The bundle write was aborted or failed before completing.
    #[error("Write barrier aborted: {0}")]
    WriteBarrier(String),

    /// A rewrite list could not be applied to its source.
    #[error("Invalid rewrite: {0}")]
    InvalidRewrite(String),
}

/// Result type alias for litpack-bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

fn format_hook_failures(failures: &[HookFailure]) -> String {
    match failures {
        [] => "emit hooks failed".to_string(),
        [single] => format!("Emit hook failed: {single}"),
        many => format!(
            "{} emit hooks failed: {}",
            many.len(),
            many.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        ),
    }
}

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::InvalidOutputPath(_) => "INVALID_OUTPUT_PATH",
            Error::WriteFailure(_) => "WRITE_FAILURE",
            Error::OutputExists(_) => "OUTPUT_EXISTS",
            Error::Plugin { .. } => "PLUGIN_ERROR",
            Error::Transform { .. } => "TRANSFORM_ERROR",
            Error::EmitHooks(_) => "EMIT_HOOK_ERROR",
            Error::WriteBarrier(_) => "WRITE_ABORTED",
            Error::InvalidRewrite(_) => "INVALID_REWRITE",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::InvalidConfig(msg) => Some(Box::new(format!(
                "Check your litpack configuration for missing or malformed options.\nError: {}",
                msg
            ))),
            Error::InvalidOutputPath(path) => Some(Box::new(format!(
                "The output path '{}' is invalid. Ensure it's within the output directory and doesn't contain '..' components.",
                path
            ))),
            Error::WriteFailure(msg) => Some(Box::new(format!(
                "Failed to write file. Check disk space and permissions.\nError: {}",
                msg
            ))),
            Error::OutputExists(msg) => Some(Box::new(format!(
                "Output file already exists: {}\nEnable overwrite to replace existing files.",
                msg
            ))),
            Error::Transform { id, .. } => Some(Box::new(format!(
                "The module '{}' could not be processed. Fix the source or exclude it from this plugin.",
                id
            ))),
            Error::EmitHooks(failures) if failures.len() > 1 => Some(Box::new(
                "Multiple post-emission stages failed. See details above.".to_string(),
            )),
            Error::WriteBarrier(_) => Some(Box::new(
                "Stages that depend on written output were skipped because the bundle was not written.",
            )),
            _ => None,
        }
    }
}

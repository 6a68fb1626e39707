#![cfg_attr(docsrs, feature(doc_cfg))]

//! # litpack
//!
//! Build pipeline for lit-html applications and libraries.
//!
//! litpack does not bundle by itself. It supplies the plugins that run around
//! an external bundler (stylesheet imports, template minification, resource
//! copying, HTML entry injection, compression) and picks the set to run from
//! the build variant.
//!
//! ## Example
//!
//! ```no_run
//! use litpack::{BuildVariant, Pipeline};
//! use litpack::bundler::{Bundle, FsOutputWriter};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Pipeline::load(".", None, BuildVariant::from_process_env())?;
//!
//! let module = pipeline.transform_file("src/app.js".as_ref()).await?;
//! let mut bundle = Bundle::default();
//! bundle.push_entry("app", "app.js", module.code);
//!
//! let report = pipeline.emit(bundle, false, &FsOutputWriter).await?;
//! for diagnostic in &report.diagnostics {
//!     eprintln!("{diagnostic}");
//! }
//! # Ok(()) }
//! ```

mod compose;
mod error;
mod pipeline;

pub use compose::{Composer, compose};
pub use error::{Error, Result};
pub use pipeline::Pipeline;

pub use litpack_config::{BuildVariant, LitpackConfig};

/// Plugin contract, driver and built-in post-emission plugins.
pub use litpack_bundler as bundler;
/// Configuration types and discovery.
pub use litpack_config as config;
/// Stylesheet import plugin.
pub use litpack_plugin_css as css;
/// Markup-literal minification plugin.
pub use litpack_plugin_lit as lit;

//! Configuration for litpack builds.
//!
//! A config is plain data: every stage has a `#[serde(default)]` block, so
//! `LitpackConfig::default()` is a complete, valid configuration. Files are
//! discovered with [`ConfigDiscovery`] and the active [`BuildVariant`] picks the
//! profile overlay that is merged on top.

pub mod config;
pub mod discovery;
pub mod error;
pub mod externals;
pub mod settings;
pub mod stages;
pub mod validation;
pub mod variant;

// Re-export main types
pub use config::*;
pub use error::*;
pub use settings::*;
pub use stages::*;
pub use variant::BuildVariant;

// Re-export discovery and validation
pub use discovery::{ConfigDiscovery, discover};
pub use externals::{externals_from_package_json, externals_from_package_str};
pub use validation::{ConfigValidator, FsValidator, SchemaValidator, validate_fs, validate_schema};

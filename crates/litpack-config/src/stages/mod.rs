//! Per-stage configuration blocks.
//!
//! Every block deserializes with `#[serde(default)]` so a config file only
//! needs to mention the options it changes.

mod clean;
mod compress;
mod copy;
mod helpers;
mod html;
mod lit;
mod replace;
mod size_report;
mod styles;

pub use clean::CleanConfig;
pub use compress::{CompressAlgorithm, CompressConfig};
pub use copy::{CopyConfig, ResourcePair};
pub use html::HtmlConfig;
pub use lit::{LitConfig, MatcherKind, MinifierConfig, TagMatcherConfig};
pub use replace::ReplaceConfig;
pub use size_report::SizeReportConfig;
pub use styles::StyleConfig;

pub(crate) use helpers::{default_output_dir, default_true};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::helpers::default_true;

/// Options for emptying output directories before the bundle is written.
///
/// Serve builds never clean, so a running dev server keeps its files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Directories to remove. Empty means the output directory.
    #[serde(default)]
    pub targets: Vec<PathBuf>,

    #[serde(default = "default_true")]
    pub verbose: bool,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            targets: Vec::new(),
            verbose: true,
        }
    }
}

impl CleanConfig {
    pub fn with_targets(mut self, targets: Vec<PathBuf>) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::helpers::default_true;

/// A single `from -> to` copy instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePair {
    pub from: PathBuf,
    pub to: PathBuf,
}

impl ResourcePair {
    pub fn new(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyConfig {
    #[serde(default)]
    pub resources: Vec<ResourcePair>,

    /// Replace destinations that already exist.
    #[serde(default = "default_true")]
    pub overwrite: bool,

    #[serde(default = "default_true")]
    pub verbose: bool,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            resources: Vec::new(),
            overwrite: true,
            verbose: true,
        }
    }
}

impl CopyConfig {
    pub fn with_resource(mut self, from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        self.resources.push(ResourcePair::new(from, to));
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::copy::ResourcePair;

/// Source files swapped for another file when imported, such as
/// `src/env.ts -> src/env.prod.ts` in a production profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceConfig {
    #[serde(default)]
    pub resources: Vec<ResourcePair>,
}

impl ReplaceConfig {
    pub fn with_resource(mut self, from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        self.resources.push(ResourcePair::new(from, to));
        self
    }
}

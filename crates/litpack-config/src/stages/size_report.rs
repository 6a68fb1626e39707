use serde::{Deserialize, Serialize};

use super::helpers::default_true;

/// Options for the post-write size report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeReportConfig {
    /// Warn when a written file is larger than this many bytes.
    #[serde(default)]
    pub max_bytes: Option<u64>,

    #[serde(default = "default_true")]
    pub verbose: bool,
}

impl Default for SizeReportConfig {
    fn default() -> Self {
        Self {
            max_bytes: None,
            verbose: true,
        }
    }
}

//! Global configuration settings shared across profiles.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Log filter directive used when `RUST_LOG` is not set (e.g. `"debug"`).
    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(default)]
    pub no_color: bool,
}

use serde::{Deserialize, Serialize};

use super::helpers::{default_style_extensions, default_true};

/// Options for importing stylesheets as modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Extensions handled by the style stage, including the leading dot.
    #[serde(default = "default_style_extensions")]
    pub file_extensions: Vec<String>,

    /// File names (not paths) that are injected into `document.head` on import.
    #[serde(default)]
    pub global_file_names: Vec<String>,

    /// Minify the processed stylesheet.
    #[serde(default)]
    pub minify: bool,

    /// Log rules the CSS parser had to skip at `warn` instead of `debug`.
    #[serde(default = "default_true")]
    pub verbose: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            file_extensions: default_style_extensions(),
            global_file_names: Vec::new(),
            minify: false,
            verbose: true,
        }
    }
}

impl StyleConfig {
    pub fn with_global_file_names(mut self, names: Vec<String>) -> Self {
        self.global_file_names = names;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }
}

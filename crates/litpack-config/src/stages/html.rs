use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::helpers::{default_script_type, default_true};

/// Options for injecting entry scripts into an HTML shell.
///
/// `template` and `target` are optional here so that a partially written
/// config still deserializes; the HTML stage rejects a missing value when it
/// is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlConfig {
    #[serde(default)]
    pub template: Option<PathBuf>,

    #[serde(default)]
    pub target: Option<PathBuf>,

    /// Output file name patterns (regex) to inject. Empty means every entry.
    #[serde(default)]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,

    /// Value of the `type` attribute on injected script tags.
    #[serde(default = "default_script_type")]
    pub script_type: String,

    #[serde(default = "default_true")]
    pub verbose: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            template: None,
            target: None,
            include: Vec::new(),
            exclude: Vec::new(),
            script_type: default_script_type(),
            verbose: true,
        }
    }
}

impl HtmlConfig {
    pub fn new(template: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            template: Some(template.into()),
            target: Some(target.into()),
            ..Self::default()
        }
    }

    pub fn with_include(mut self, include: Vec<String>) -> Self {
        self.include = include;
        self
    }

    pub fn with_script_type(mut self, script_type: impl Into<String>) -> Self {
        self.script_type = script_type.into();
        self
    }
}

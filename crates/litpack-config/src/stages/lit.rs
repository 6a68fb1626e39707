use serde::{Deserialize, Serialize};

use super::helpers::{
    default_ignore_fragments, default_lit_modules, default_script_patterns, default_true,
};

/// Options for the markup-literal minification stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LitConfig {
    /// Module id patterns (regex) to process.
    #[serde(default = "default_script_patterns")]
    pub include: Vec<String>,

    /// Module id patterns (regex) to skip, checked before `include`.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Log recoverable failures at `warn` instead of `debug`.
    #[serde(default = "default_true")]
    pub verbose: bool,

    #[serde(default)]
    pub matcher: TagMatcherConfig,

    #[serde(default)]
    pub minifier: MinifierConfig,
}

impl Default for LitConfig {
    fn default() -> Self {
        Self {
            include: default_script_patterns(),
            exclude: Vec::new(),
            verbose: true,
            matcher: TagMatcherConfig::default(),
            minifier: MinifierConfig::default(),
        }
    }
}

impl LitConfig {
    pub fn with_include(mut self, include: Vec<String>) -> Self {
        self.include = include;
        self
    }

    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_matcher(mut self, matcher: TagMatcherConfig) -> Self {
        self.matcher = matcher;
        self
    }
}

/// How tagged templates are recognised as markup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatcherKind {
    /// Tag is the identifier `html` or a member expression ending in `.html`.
    #[default]
    Heuristic,
    /// Tag is a local name bound by an import of `html` from one of `modules`.
    Binding,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMatcherConfig {
    #[serde(default)]
    pub kind: MatcherKind,

    /// Modules whose `html` export counts as the markup tag (binding matcher only).
    #[serde(default = "default_lit_modules")]
    pub modules: Vec<String>,
}

impl Default for TagMatcherConfig {
    fn default() -> Self {
        Self {
            kind: MatcherKind::Heuristic,
            modules: default_lit_modules(),
        }
    }
}

impl TagMatcherConfig {
    pub fn binding() -> Self {
        Self {
            kind: MatcherKind::Binding,
            ..Self::default()
        }
    }
}

/// Options for the default markup minifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinifierConfig {
    #[serde(default = "default_true")]
    pub collapse_whitespace: bool,

    /// Collapse runs of whitespace to a single space instead of removing them.
    #[serde(default = "default_true")]
    pub conservative_collapse: bool,

    /// Keep one line break when a collapsed run contained one.
    #[serde(default)]
    pub preserve_line_breaks: bool,

    #[serde(default = "default_true")]
    pub remove_comments: bool,

    /// Regex patterns whose matches are copied to the output untouched.
    #[serde(default = "default_ignore_fragments")]
    pub ignore_custom_fragments: Vec<String>,
}

impl Default for MinifierConfig {
    fn default() -> Self {
        Self {
            collapse_whitespace: true,
            conservative_collapse: true,
            preserve_line_breaks: false,
            remove_comments: true,
            ignore_custom_fragments: default_ignore_fragments(),
        }
    }
}

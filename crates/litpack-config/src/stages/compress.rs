use serde::{Deserialize, Serialize};

use super::helpers::{default_brotli_quality, default_gzip_level, default_true};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressAlgorithm {
    Gzip,
    Brotli,
}

impl CompressAlgorithm {
    /// File extension appended to the compressed copy, including the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Gzip => ".gz",
            Self::Brotli => ".br",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Brotli => "brotli",
        }
    }
}

fn default_algorithms() -> Vec<CompressAlgorithm> {
    vec![CompressAlgorithm::Gzip, CompressAlgorithm::Brotli]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressConfig {
    #[serde(default = "default_algorithms")]
    pub algorithms: Vec<CompressAlgorithm>,

    /// Output file name patterns (regex) to compress. Empty means every file.
    #[serde(default)]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,

    /// gzip level, 0 to 9.
    #[serde(default = "default_gzip_level")]
    pub gzip_level: u32,

    /// brotli quality, 0 to 11.
    #[serde(default = "default_brotli_quality")]
    pub brotli_quality: u32,

    #[serde(default = "default_true")]
    pub verbose: bool,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            algorithms: default_algorithms(),
            include: Vec::new(),
            exclude: Vec::new(),
            gzip_level: default_gzip_level(),
            brotli_quality: default_brotli_quality(),
            verbose: true,
        }
    }
}

impl CompressConfig {
    pub fn with_algorithms(mut self, algorithms: Vec<CompressAlgorithm>) -> Self {
        self.algorithms = algorithms;
        self
    }

    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }
}

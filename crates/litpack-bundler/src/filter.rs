//! Include/exclude filtering of module ids and output file names.

use regex::Regex;

use crate::{Error, Result};

/// Regex include/exclude filter.
///
/// Exclusion wins. An empty include list accepts everything not excluded.
#[derive(Debug, Clone, Default)]
pub struct IdFilter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl IdFilter {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    /// A filter that accepts every id.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, id: &str) -> bool {
        if self.exclude.iter().any(|re| re.is_match(id)) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|re| re.is_match(id))
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern)
                .map_err(|e| Error::InvalidConfig(format!("invalid pattern '{pattern}': {e}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_filter_accepts_everything() {
        assert!(IdFilter::all().matches("src/anything.txt"));
    }

    #[test]
    fn include_and_exclude() {
        let filter =
            IdFilter::new(&patterns(&[r"\.js$", r"\.ts$"]), &patterns(&["node_modules"])).unwrap();

        assert!(filter.matches("src/app.ts"));
        assert!(!filter.matches("src/app.css"));
        assert!(!filter.matches("node_modules/lit/index.js"));
    }

    #[test]
    fn invalid_pattern_is_config_error() {
        let err = IdFilter::new(&patterns(&["["]), &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}

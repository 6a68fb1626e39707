//! Stylesheet processors.

use std::path::Path;
use std::sync::{Arc, RwLock};

use lightningcss::{
    printer::PrinterOptions,
    stylesheet::{MinifyOptions, ParserOptions, StyleSheet},
};

use crate::error::{Result, StyleError};

/// Output of one processor: the new CSS plus anything it had to skip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Processed {
    pub css: String,
    /// Recovered problems, one message each. The stylesheet is still usable.
    pub warnings: Vec<String>,
}

impl From<String> for Processed {
    fn from(css: String) -> Self {
        Self {
            css,
            warnings: Vec::new(),
        }
    }
}

/// One step of the style processing chain.
///
/// Each processor receives the previous processor's output.
pub trait StyleProcessor: Send + Sync {
    fn name(&self) -> &str;

    fn process(&self, css: &str, id: &str) -> Result<Processed>;
}

/// Compiles `.scss` sources to plain CSS with grass. Other ids pass through.
///
/// `@import`/`@use` are resolved relative to the importing file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScssProcessor;

impl StyleProcessor for ScssProcessor {
    fn name(&self) -> &str {
        "grass"
    }

    fn process(&self, css: &str, id: &str) -> Result<Processed> {
        if !id.ends_with(".scss") {
            return Ok(css.to_string().into());
        }

        let dir = Path::new(id).parent().unwrap_or(Path::new("."));
        let options = grass::Options::default().load_path(dir);
        grass::from_string(css.to_string(), &options)
            .map(Processed::from)
            .map_err(|e| StyleError::Processor {
                processor: self.name().to_string(),
                id: id.to_string(),
                message: e.to_string(),
            })
    }
}

/// Parses, optionally minifies and prints a stylesheet with lightningcss.
///
/// Rules the parser cannot understand are dropped and returned as warnings.
#[derive(Debug, Clone, Default)]
pub struct LightningCssProcessor {
    minify: bool,
}

impl LightningCssProcessor {
    pub fn new(minify: bool) -> Self {
        Self { minify }
    }
}

impl StyleProcessor for LightningCssProcessor {
    fn name(&self) -> &str {
        "lightningcss"
    }

    fn process(&self, css: &str, id: &str) -> Result<Processed> {
        let warnings = Arc::new(RwLock::new(Vec::new()));
        let mut stylesheet = StyleSheet::parse(
            css,
            ParserOptions {
                filename: id.to_string(),
                error_recovery: true,
                warnings: Some(Arc::clone(&warnings)),
                ..Default::default()
            },
        )
        .map_err(|e| StyleError::Parse {
            id: id.to_string(),
            message: e.to_string(),
        })?;

        if self.minify {
            stylesheet
                .minify(MinifyOptions::default())
                .map_err(|e| StyleError::Minify {
                    id: id.to_string(),
                    message: e.to_string(),
                })?;
        }

        let result = stylesheet
            .to_css(PrinterOptions {
                minify: self.minify,
                ..Default::default()
            })
            .map_err(|e| StyleError::Print {
                id: id.to_string(),
                message: e.to_string(),
            })?;

        let warnings = match warnings.read() {
            Ok(list) => list.iter().map(ToString::to_string).collect(),
            Err(poisoned) => poisoned.get_ref().iter().map(ToString::to_string).collect(),
        };

        Ok(Processed {
            css: result.code,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_basic_css() {
        let out = LightningCssProcessor::default()
            .process("body { color: red; }", "test.css")
            .unwrap();
        assert!(out.css.contains("color: red"));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_process_with_minification() {
        let css = "body {\n  color: red;\n  background: blue;\n}";
        let out = LightningCssProcessor::new(true)
            .process(css, "test.css")
            .unwrap();
        assert!(out.css.len() < css.len());
        assert!(out.css.contains("color:red"));
        assert!(out.css.contains("background:"));
    }

    #[test]
    fn skipped_rules_become_warnings() {
        let out = LightningCssProcessor::default()
            .process("$gap: 4px;\np { margin: 0; }\n.b { color: blue; }", "theme.css")
            .unwrap();
        assert!(out.css.contains(".b"));
        assert!(!out.warnings.is_empty());
    }

    #[test]
    fn scss_variables_and_nesting_compile() {
        let out = ScssProcessor
            .process("$primary: red;\n.a { .b { color: $primary; } }", "theme.scss")
            .unwrap();
        assert!(out.css.contains(".a .b"));
        assert!(out.css.contains("color: red"));
    }

    #[test]
    fn plain_css_is_not_compiled_as_scss() {
        let out = ScssProcessor.process("$x: 1;", "theme.css").unwrap();
        assert_eq!(out.css, "$x: 1;");
    }

    #[test]
    fn invalid_scss_is_a_processor_error() {
        let err = ScssProcessor
            .process("p { color: $missing; }", "broken.scss")
            .unwrap_err();
        assert!(matches!(err, StyleError::Processor { ref processor, .. } if processor == "grass"));
    }
}

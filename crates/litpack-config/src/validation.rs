//! Pluggable config validation strategies
//!
//! Separates filesystem validation (for CLI use) from schema validation (for library use).

use std::path::Path;

use regex::Regex;

use crate::config::LitpackConfig;
use crate::error::{ConfigError, Result};

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    fn validate(&self, config: &LitpackConfig) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// # Example
///
/// ```
/// use litpack_config::{ConfigValidator, LitpackConfig, SchemaValidator};
///
/// let config = LitpackConfig::default();
/// SchemaValidator.validate(&config).unwrap();
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &LitpackConfig) -> Result<()> {
        for external in &config.external {
            if external.trim().is_empty() {
                return Err(ConfigError::SchemaValidation {
                    message: "external package names cannot be empty".to_string(),
                    hint: Some("Remove empty strings from the 'external' array".to_string()),
                });
            }
        }

        check_patterns("lit.include", &config.lit.include)?;
        check_patterns("lit.exclude", &config.lit.exclude)?;
        check_patterns(
            "lit.minifier.ignore_custom_fragments",
            &config.lit.minifier.ignore_custom_fragments,
        )?;
        check_patterns("compress.include", &config.compress.include)?;
        check_patterns("compress.exclude", &config.compress.exclude)?;

        for ext in &config.styles.file_extensions {
            if !ext.starts_with('.') {
                return Err(ConfigError::SchemaValidation {
                    message: format!("style extension '{ext}' must start with a dot"),
                    hint: Some(format!("Use '.{ext}'")),
                });
            }
        }

        if config.compress.gzip_level > 9 {
            return Err(ConfigError::SchemaValidation {
                message: format!("gzip_level {} is out of range", config.compress.gzip_level),
                hint: Some("Use a level between 0 and 9".to_string()),
            });
        }
        if config.compress.brotli_quality > 11 {
            return Err(ConfigError::SchemaValidation {
                message: format!(
                    "brotli_quality {} is out of range",
                    config.compress.brotli_quality
                ),
                hint: Some("Use a quality between 0 and 11".to_string()),
            });
        }

        if let Some(html) = &config.html {
            if html.template.is_none() {
                return Err(ConfigError::missing(
                    "html.template",
                    "Set the HTML file that entry scripts are injected into",
                ));
            }
            if html.target.is_none() {
                return Err(ConfigError::missing(
                    "html.target",
                    "Set the path the processed HTML is written to",
                ));
            }
            check_patterns("html.include", &html.include)?;
            check_patterns("html.exclude", &html.exclude)?;
        }

        for pair in &config.copy.resources {
            if pair.from.as_os_str().is_empty() || pair.to.as_os_str().is_empty() {
                return Err(ConfigError::SchemaValidation {
                    message: "copy resources need both 'from' and 'to'".to_string(),
                    hint: None,
                });
            }
        }

        for pair in &config.replace.resources {
            if pair.from.as_os_str().is_empty() || pair.to.as_os_str().is_empty() {
                return Err(ConfigError::SchemaValidation {
                    message: "replace resources need both 'from' and 'to'".to_string(),
                    hint: None,
                });
            }
        }

        if config.clean.targets.iter().any(|t| t.as_os_str().is_empty()) {
            return Err(ConfigError::SchemaValidation {
                message: "clean targets cannot be empty paths".to_string(),
                hint: Some("Leave 'targets' empty to clean the output directory".to_string()),
            });
        }

        Ok(())
    }
}

/// Schema validation plus checks that referenced inputs exist under `root`.
pub struct FsValidator<'a> {
    root: &'a Path,
}

impl<'a> FsValidator<'a> {
    pub fn new(root: &'a Path) -> Self {
        Self { root }
    }
}

impl ConfigValidator for FsValidator<'_> {
    fn validate(&self, config: &LitpackConfig) -> Result<()> {
        SchemaValidator.validate(config)?;

        if let Some(template) = config.html.as_ref().and_then(|h| h.template.as_ref()) {
            let path = self.root.join(template);
            if !path.is_file() {
                return Err(ConfigError::TemplateNotFound(path));
            }
        }

        for pair in &config.copy.resources {
            let path = self.root.join(&pair.from);
            if !path.exists() {
                return Err(ConfigError::CopySourceNotFound(path));
            }
        }

        for pair in &config.replace.resources {
            let path = self.root.join(&pair.to);
            if !path.is_file() {
                return Err(ConfigError::ReplacementNotFound(path));
            }
        }

        Ok(())
    }
}

pub fn validate_schema(config: &LitpackConfig) -> Result<()> {
    SchemaValidator.validate(config)
}

pub fn validate_fs(config: &LitpackConfig, root: &Path) -> Result<()> {
    FsValidator::new(root).validate(config)
}

fn check_patterns(field: &str, patterns: &[String]) -> Result<()> {
    for pattern in patterns {
        Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            field: field.to_string(),
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
    }
    Ok(())
}

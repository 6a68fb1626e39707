//! High-level configuration structure for litpack.
//!
//! This module provides the main `LitpackConfig` struct and profile merging logic.
//! For file discovery, see the `discovery` module.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result as ConfigResult};
use crate::settings::GlobalSettings;
use crate::stages::{
    CleanConfig, CompressConfig, CopyConfig, HtmlConfig, LitConfig, ReplaceConfig,
    SizeReportConfig, StyleConfig,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LitpackConfig {
    /// Directory the bundle is written to.
    #[serde(default = "crate::stages::default_output_dir")]
    pub output_dir: PathBuf,

    /// Specifiers that stay external in library builds.
    #[serde(default)]
    pub external: Vec<String>,

    /// Add `dependencies`/`devDependencies` from package.json to the externals
    /// of library builds.
    #[serde(default = "crate::stages::default_true")]
    pub externals_from_package: bool,

    #[serde(default)]
    pub clean: CleanConfig,

    #[serde(default)]
    pub replace: ReplaceConfig,

    #[serde(default)]
    pub lit: LitConfig,

    #[serde(default)]
    pub styles: StyleConfig,

    #[serde(default)]
    pub copy: CopyConfig,

    #[serde(default)]
    pub html: Option<HtmlConfig>,

    #[serde(default)]
    pub compress: CompressConfig,

    #[serde(default)]
    pub size_report: SizeReportConfig,

    #[serde(default)]
    pub settings: GlobalSettings,

    /// Overlays keyed by variant name (`serve`, `production`, `library`, `default`).
    #[serde(default)]
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub profiles: HashMap<String, Value>,
}

impl Default for LitpackConfig {
    fn default() -> Self {
        Self {
            output_dir: crate::stages::default_output_dir(),
            external: Vec::new(),
            externals_from_package: true,
            clean: CleanConfig::default(),
            replace: ReplaceConfig::default(),
            lit: LitConfig::default(),
            styles: StyleConfig::default(),
            copy: CopyConfig::default(),
            html: None,
            compress: CompressConfig::default(),
            size_report: SizeReportConfig::default(),
            settings: GlobalSettings::default(),
            profiles: HashMap::new(),
        }
    }
}

impl LitpackConfig {
    /// Create from serde_json::Value (for programmatic config)
    ///
    /// # Example
    ///
    /// ```
    /// use litpack_config::LitpackConfig;
    /// use serde_json::json;
    /// use std::path::PathBuf;
    ///
    /// let value = json!({
    ///     "output_dir": "build",
    ///     "compress": { "gzip_level": 6 }
    /// });
    ///
    /// let config = LitpackConfig::from_value(value).unwrap();
    /// assert_eq!(config.output_dir, PathBuf::from("build"));
    /// assert_eq!(config.compress.gzip_level, 6);
    /// assert_eq!(config.compress.brotli_quality, 11);
    /// ```
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Deep-merge the overlay stored under `profiles.<name>` into this config.
    ///
    /// Objects merge key by key; arrays and scalars in the overlay replace the
    /// base value. An unknown profile name leaves the config unchanged.
    pub fn materialize_profile(mut self, profile: Option<&str>) -> ConfigResult<Self> {
        let Some(name) = profile else {
            return Ok(self);
        };
        let Some(overlay) = self.profiles.get(name).cloned() else {
            return Ok(self);
        };
        if overlay.is_null() {
            return Ok(self);
        }

        let profiles = std::mem::take(&mut self.profiles);
        let mut base =
            serde_json::to_value(&self).map_err(|err| ConfigError::InvalidProfileOverride {
                message: err.to_string(),
            })?;
        merge_values(&mut base, &overlay);

        let mut merged: LitpackConfig =
            serde_json::from_value(base).map_err(|err| ConfigError::InvalidProfileOverride {
                message: format!("profile '{name}': {err}"),
            })?;
        merged.profiles = profiles;
        Ok(merged)
    }
}

pub(crate) fn merge_values(target: &mut Value, update: &Value) {
    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => {
            for (key, value) in update_map {
                merge_values(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (target_slot, _) => {
            *target_slot = update.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::CompressAlgorithm;
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn from_value_creates_config() {
        let value = json!({
            "external": ["lit"],
            "styles": { "minify": true }
        });

        let config = LitpackConfig::from_value(value).unwrap();
        assert_eq!(config.external, vec!["lit".to_string()]);
        assert!(config.styles.minify);
        assert_eq!(config.styles.file_extensions, vec![".css", ".scss"]);
    }

    #[test]
    fn to_value_serializes_config() {
        let mut config = LitpackConfig::default();
        config.compress.gzip_level = 4;

        let value = config.to_value().unwrap();
        assert_eq!(value["compress"]["gzip_level"], json!(4));
        assert!(value.get("profiles").is_none());
    }

    #[test]
    fn profile_merging_works() {
        let value = json!({
            "compress": { "algorithms": ["gzip", "brotli"], "gzip_level": 9 },
            "profiles": {
                "production": {
                    "compress": { "algorithms": ["brotli"] },
                    "size_report": { "max_bytes": 1024 }
                }
            }
        });

        let config = LitpackConfig::from_value(value)
            .unwrap()
            .materialize_profile(Some("production"))
            .unwrap();

        assert_eq!(config.compress.algorithms, vec![CompressAlgorithm::Brotli]);
        assert_eq!(config.compress.gzip_level, 9);
        assert_eq!(config.size_report.max_bytes, Some(1024));
        assert!(config.profiles.contains_key("production"));
    }

    #[test]
    fn unknown_profile_is_a_no_op() {
        let config = LitpackConfig::default()
            .materialize_profile(Some("serve"))
            .unwrap();
        assert_eq!(config, LitpackConfig::default());
    }

    #[test]
    fn bad_profile_value_is_reported() {
        let value = json!({
            "profiles": { "production": { "compress": { "gzip_level": "high" } } }
        });

        let err = LitpackConfig::from_value(value)
            .unwrap()
            .materialize_profile(Some("production"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidProfileOverride { .. }));
    }

    #[test]
    fn production_profile_can_swap_files() {
        let value = json!({
            "profiles": {
                "production": {
                    "replace": { "resources": [{ "from": "src/env.ts", "to": "src/env.prod.ts" }] }
                }
            }
        });

        let config = LitpackConfig::from_value(value).unwrap();
        assert!(config.replace.resources.is_empty());
        assert!(config.clean.enabled);

        let config = config.materialize_profile(Some("production")).unwrap();
        assert_eq!(config.replace.resources.len(), 1);
        assert_eq!(config.replace.resources[0].to, PathBuf::from("src/env.prod.ts"));
    }

    #[test]
    fn merge_replaces_arrays() {
        let mut base = json!({ "a": [1, 2], "b": { "c": 1, "d": 2 } });
        merge_values(&mut base, &json!({ "a": [3], "b": { "d": 5 } }));
        assert_eq!(base, json!({ "a": [3], "b": { "c": 1, "d": 5 } }));
    }
}

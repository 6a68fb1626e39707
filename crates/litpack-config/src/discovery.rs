//! File-based config discovery for CLI use
//!
//! Handles finding and loading litpack configuration files from the filesystem.
//! Values are layered with figment: built-in defaults, then the config file,
//! then `LITPACK_*` environment variables (nested keys separated by `__`, e.g.
//! `LITPACK_COMPRESS__GZIP_LEVEL=6`).

use std::fs;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use serde_json::Value;

use crate::config::LitpackConfig;
use crate::error::{ConfigError, Result};
use crate::variant::BuildVariant;

/// Name of the TOML config file searched for in the project root.
pub const CONFIG_FILE_NAME: &str = "litpack.toml";

/// Field of `package.json` that may hold the config instead.
pub const PACKAGE_JSON_FIELD: &str = "litpack";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "LITPACK_";

/// File-based configuration discovery
///
/// # Example
///
/// ```no_run
/// use litpack_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let config = discovery.load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
    use_env: bool,
}

impl ConfigDiscovery {
    /// Create a new config discovery with a root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            use_env: true,
        }
    }

    /// Skip the `LITPACK_*` environment layer.
    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. TOML config: litpack.toml
    /// 2. package.json (litpack field)
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join(CONFIG_FILE_NAME);
        if toml_path.exists() {
            return Some(toml_path);
        }

        let pkg_path = self.root.join("package.json");
        let content = fs::read_to_string(&pkg_path).ok()?;
        let parsed = serde_json::from_str::<Value>(&content).ok()?;
        match parsed.get(PACKAGE_JSON_FIELD) {
            Some(field) if !field.is_null() => Some(pkg_path),
            _ => None,
        }
    }

    /// Load config from discovered file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<LitpackConfig> {
        let path = self.find().ok_or(ConfigError::NotFound)?;
        self.load_from(&path)
    }

    /// Load the discovered config, or defaults (plus env) when there is none.
    pub fn load_or_default(&self) -> Result<LitpackConfig> {
        match self.find() {
            Some(path) => self.load_from(&path),
            None => self.extract(self.base()),
        }
    }

    /// Load config and apply the profile named after `variant`.
    pub fn load_for_variant(&self, variant: BuildVariant) -> Result<LitpackConfig> {
        self.load_or_default()?
            .materialize_profile(Some(variant.as_str()))
    }

    /// Load config from a specific file path
    pub fn load_from(&self, path: &Path) -> Result<LitpackConfig> {
        tracing::debug!(path = %path.display(), "loading litpack config");
        let figment = if path.file_name() == Some(std::ffi::OsStr::new("package.json")) {
            self.base()
                .merge(Serialized::defaults(package_json_field(path)?))
        } else {
            if !path.exists() {
                return Err(ConfigError::NotFound);
            }
            self.base().merge(Toml::file(path))
        };

        self.extract(figment)
    }

    fn base(&self) -> Figment {
        Figment::new().merge(Serialized::defaults(LitpackConfig::default()))
    }

    fn extract(&self, mut figment: Figment) -> Result<LitpackConfig> {
        if self.use_env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }

        figment.extract().map_err(|e| ConfigError::InvalidValue {
            field: "configuration".to_string(),
            hint: Some(e.to_string()),
        })
    }
}

fn package_json_field(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;

    let parsed: Value = serde_json::from_str(&content).map_err(|e| ConfigError::InvalidValue {
        field: "package.json".to_string(),
        hint: Some(format!("Invalid JSON: {e}")),
    })?;

    match parsed.get(PACKAGE_JSON_FIELD) {
        Some(value) if !value.is_null() => Ok(value.clone()),
        Some(_) => Err(ConfigError::InvalidValue {
            field: PACKAGE_JSON_FIELD.to_string(),
            hint: Some("The 'litpack' field cannot be null".to_string()),
        }),
        None => Err(ConfigError::InvalidValue {
            field: PACKAGE_JSON_FIELD.to_string(),
            hint: Some("Add a 'litpack' field to your package.json".to_string()),
        }),
    }
}

/// Discover and load config from current directory (convenience function)
pub fn discover() -> Result<LitpackConfig> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load_or_default()
}

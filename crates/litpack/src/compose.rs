//! Plugin sets per build variant.
//!
//! Composition only appends. The base set comes first, then the plugins of
//! the selected variant, so a plugin never moves or disappears between
//! variants.
//!
//! The base set is `clean` (when enabled; inert for `serve`), `replace` (when
//! configured), the caller's base plugins, style import, copy and, when
//! configured, HTML injection.
//!
//! | variant      | plugins after the base set                                      |
//! |--------------|-----------------------------------------------------------------|
//! | `serve`      | caller serve plugins                                            |
//! | `production` | template minification, caller production plugins, size report, compression |
//! | `library`    | none; externals from config and `package.json`                  |
//! | `default`    | none                                                            |

use std::path::{Path, PathBuf};

use litpack_bundler::plugins::{
    CleanPlugin, CompressPlugin, CopyPlugin, HtmlTemplatePlugin, ReplacePlugin, SizeReportPlugin,
};
use litpack_bundler::{PluginRegistry, SharedPlugin};
use litpack_config::{BuildVariant, LitpackConfig, externals_from_package_json};
use litpack_plugin_css::StyleImportPlugin;
use litpack_plugin_lit::LitMinifyPlugin;

use crate::Result;

/// Builds the plugin registry for a variant.
///
/// Plugins the pipeline does not ship (module resolution, TypeScript, a dev
/// server, a code minifier) are supplied by the caller and slotted in at
/// fixed positions.
#[derive(Clone)]
pub struct Composer {
    config: LitpackConfig,
    root: PathBuf,
    base: Vec<SharedPlugin>,
    serve: Vec<SharedPlugin>,
    production: Vec<SharedPlugin>,
}

impl Composer {
    pub fn new(config: LitpackConfig) -> Self {
        Self {
            config,
            root: PathBuf::new(),
            base: Vec::new(),
            serve: Vec::new(),
            production: Vec::new(),
        }
    }

    /// Directory relative paths in the config are resolved against.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Plugins placed after `clean`/`replace` and before the other built-in
    /// plugins, in all variants.
    pub fn with_base_plugins(mut self, plugins: Vec<SharedPlugin>) -> Self {
        self.base = plugins;
        self
    }

    pub fn with_serve_plugins(mut self, plugins: Vec<SharedPlugin>) -> Self {
        self.serve = plugins;
        self
    }

    /// Plugins placed between template minification and the size report.
    pub fn with_production_plugins(mut self, plugins: Vec<SharedPlugin>) -> Self {
        self.production = plugins;
        self
    }

    pub fn config(&self) -> &LitpackConfig {
        &self.config
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn compose(&self, variant: BuildVariant) -> Result<PluginRegistry> {
        let mut registry = self.base_registry(variant)?;

        match variant {
            BuildVariant::Serve => {
                registry.extend(self.serve.iter().cloned());
            }
            BuildVariant::Production => {
                registry.add(LitMinifyPlugin::new(self.config.lit.clone())?);
                registry.extend(self.production.iter().cloned());
                registry.add(SizeReportPlugin::new(self.config.size_report.clone()));
                registry.add(CompressPlugin::new(self.config.compress.clone())?);
            }
            BuildVariant::Library => {
                registry.add_externals(self.library_externals()?);
            }
            BuildVariant::Default => {}
        }

        tracing::debug!(
            variant = %variant,
            plugins = ?registry.names(),
            externals = registry.externals().len(),
            "composed plugin set"
        );
        Ok(registry)
    }

    fn base_registry(&self, variant: BuildVariant) -> Result<PluginRegistry> {
        let mut registry = PluginRegistry::new();
        if self.config.clean.enabled {
            let mut clean = self.config.clean.clone();
            clean.enabled = variant != BuildVariant::Serve;
            registry.add(CleanPlugin::new(clean).with_root(self.root.clone()));
        }
        if !self.config.replace.resources.is_empty() {
            registry.add(
                ReplacePlugin::new(self.config.replace.clone()).with_root(self.root.clone()),
            );
        }
        registry.extend(self.base.iter().cloned());
        registry.add(StyleImportPlugin::new(self.config.styles.clone()));
        registry.add(CopyPlugin::new(self.config.copy.clone()).with_root(self.root.clone()));
        if let Some(html) = &self.config.html {
            registry.add(HtmlTemplatePlugin::new(html.clone())?.with_root(self.root.clone()));
        }
        Ok(registry)
    }

    fn library_externals(&self) -> Result<Vec<String>> {
        let mut externals = self.config.external.clone();
        if self.config.externals_from_package {
            let package_json = self.root.join("package.json");
            if package_json.is_file() {
                externals.extend(externals_from_package_json(&package_json)?);
            } else {
                tracing::debug!(
                    "no package.json at {}, using configured externals only",
                    package_json.display()
                );
            }
        }
        Ok(externals)
    }
}

impl std::fmt::Debug for Composer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = |plugins: &[SharedPlugin]| -> Vec<String> {
            plugins.iter().map(|p| p.name().to_string()).collect()
        };
        f.debug_struct("Composer")
            .field("root", &self.root)
            .field("base", &names(&self.base))
            .field("serve", &names(&self.serve))
            .field("production", &names(&self.production))
            .finish_non_exhaustive()
    }
}

/// [`Composer::compose`] without caller plugins.
pub fn compose(config: &LitpackConfig, variant: BuildVariant) -> Result<PluginRegistry> {
    Composer::new(config.clone()).compose(variant)
}


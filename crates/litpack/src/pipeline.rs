//! A composed plugin set bound to one configuration and variant.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use litpack_bundler::{
    BuildReport, Bundle, FinishOptions, OutputWriter, PluginDriver, SourceModule,
    TransformedModule,
};
use litpack_config::{BuildVariant, ConfigDiscovery, LitpackConfig, validate_fs, validate_schema};

use crate::compose::Composer;
use crate::{Error, Result};

pub struct Pipeline {
    variant: BuildVariant,
    config: LitpackConfig,
    root: PathBuf,
    driver: PluginDriver,
}

impl Pipeline {
    /// Validate the composer's config and compose the plugin set for `variant`.
    pub fn new(composer: Composer, variant: BuildVariant) -> Result<Self> {
        validate_schema(composer.config())?;
        validate_fs(composer.config(), composer.root())?;

        let driver = composer.compose(variant)?.into_driver();
        Ok(Self {
            variant,
            config: composer.config().clone(),
            root: composer.root().to_path_buf(),
            driver,
        })
    }

    /// Discover the config under `root` (or read `config_file`), apply the
    /// profile for `variant` and compose.
    pub fn load(
        root: impl AsRef<Path>,
        config_file: Option<&Path>,
        variant: BuildVariant,
    ) -> Result<Self> {
        let root = root.as_ref();
        let discovery = ConfigDiscovery::new(root);
        let config = match config_file {
            Some(path) => discovery
                .load_from(path)?
                .materialize_profile(Some(variant.as_str()))?,
            None => discovery.load_for_variant(variant)?,
        };
        Self::new(Composer::new(config).with_root(root), variant)
    }

    pub fn variant(&self) -> BuildVariant {
        self.variant
    }

    pub fn config(&self) -> &LitpackConfig {
        &self.config
    }

    pub fn driver(&self) -> &PluginDriver {
        &self.driver
    }

    pub fn output_dir(&self) -> PathBuf {
        if self.config.output_dir.is_absolute() {
            self.config.output_dir.clone()
        } else {
            self.root.join(&self.config.output_dir)
        }
    }

    /// Read `path` and run it through every `transform` hook.
    pub async fn transform_file(&self, path: &Path) -> Result<TransformedModule> {
        let code = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| Error::ReadModule {
                path: path.display().to_string(),
                source,
            })?;
        let id = path.to_string_lossy().replace('\\', "/");
        Ok(self.driver.transform(SourceModule::new(id, code))?)
    }

    /// Write `bundle` with `writer` into the output directory and run the
    /// post-emission plugins. A dry run writes nothing and runs no hooks.
    pub async fn emit(
        &self,
        bundle: Bundle,
        dry: bool,
        writer: &dyn OutputWriter,
    ) -> Result<BuildReport> {
        let output_dir = self.output_dir();
        let options = if dry {
            FinishOptions::dry_run(output_dir)
        } else {
            FinishOptions::write_to(output_dir)
        };
        Ok(self.driver.finish(Arc::new(bundle), &options, writer).await?)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("variant", &self.variant)
            .field("root", &self.root)
            .field("plugins", &self.driver.plugin_names())
            .finish_non_exhaustive()
    }
}

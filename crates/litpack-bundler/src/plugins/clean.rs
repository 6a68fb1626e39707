use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use litpack_config::CleanConfig;
use path_clean::PathClean;

use super::resolve_from;
use crate::plugin::{Plugin, WriteContext};

/// Removes stale output before the bundle is written.
///
/// Only runs for writers that put the bundle on disk themselves, so files an
/// external bundler already wrote are never touched.
#[derive(Debug, Clone)]
pub struct CleanPlugin {
    config: CleanConfig,
    root: PathBuf,
}

impl CleanPlugin {
    pub const NAME: &'static str = "clean";

    pub fn new(config: CleanConfig) -> Self {
        Self {
            config,
            root: PathBuf::new(),
        }
    }

    /// Resolve relative targets against `root`. `root` itself, and anything
    /// containing it, is never removed.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    fn targets(&self, output_dir: &Path) -> Vec<PathBuf> {
        if self.config.targets.is_empty() {
            return vec![output_dir.to_path_buf()];
        }
        self.config
            .targets
            .iter()
            .map(|target| resolve_from(&self.root, target))
            .collect()
    }
}

#[async_trait]
impl Plugin for CleanPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn before_write(&self, ctx: &WriteContext) -> anyhow::Result<()> {
        if !self.config.enabled {
            return Ok(());
        }

        let project = absolute(&self.root)?;
        for target in self.targets(&ctx.output_dir) {
            let target = absolute(&target)?;
            if project.starts_with(&target) {
                anyhow::bail!(
                    "refusing to clean '{}', it contains the project root",
                    target.display()
                );
            }

            match tokio::fs::remove_dir_all(&target).await {
                Ok(()) => {
                    if self.config.verbose {
                        tracing::info!("[clean] removed {}", target.display());
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!("[clean] {} does not exist", target.display());
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("could not clean '{}'", target.display()));
                }
            }
        }
        Ok(())
    }
}

fn absolute(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.clean())
    } else {
        Ok(std::env::current_dir()?.join(path).clean())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn write_ctx(output_dir: &Path) -> WriteContext {
        WriteContext {
            output_dir: output_dir.to_path_buf(),
            diagnostics: Arc::default(),
        }
    }

    #[tokio::test]
    async fn removes_the_output_directory_by_default() {
        let dir = TempDir::new().unwrap();
        let dist = dir.path().join("dist");
        fs::create_dir_all(dist.join("chunks")).unwrap();
        fs::write(dist.join("chunks/old-1a2b.js"), "stale").unwrap();

        CleanPlugin::new(CleanConfig::default())
            .with_root(dir.path())
            .before_write(&write_ctx(&dist))
            .await
            .unwrap();

        assert!(!dist.exists());
        assert!(dir.path().exists());
    }

    #[tokio::test]
    async fn missing_targets_are_fine() {
        let dir = TempDir::new().unwrap();
        CleanPlugin::new(CleanConfig::default().with_targets(vec!["build".into()]))
            .with_root(dir.path())
            .before_write(&write_ctx(&dir.path().join("dist")))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn refuses_to_remove_the_project_root() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();

        let err = CleanPlugin::new(CleanConfig::default().with_targets(vec![".".into()]))
            .with_root(dir.path())
            .before_write(&write_ctx(&dir.path().join("dist")))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("project root"));
        assert!(dir.path().join("package.json").exists());
    }

    #[tokio::test]
    async fn disabled_clean_keeps_files() {
        let dir = TempDir::new().unwrap();
        let dist = dir.path().join("dist");
        fs::create_dir_all(&dist).unwrap();
        fs::write(dist.join("keep.js"), "1").unwrap();

        CleanPlugin::new(CleanConfig::default().with_enabled(false))
            .with_root(dir.path())
            .before_write(&write_ctx(&dist))
            .await
            .unwrap();

        assert!(dist.join("keep.js").exists());
    }
}

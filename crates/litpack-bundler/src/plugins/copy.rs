use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use litpack_config::CopyConfig;
use walkdir::WalkDir;

use super::resolve_from;
use crate::diagnostics::{Diagnostic, report};
use crate::plugin::{EmitContext, Plugin};

/// Copies files and directories after the bundle is emitted.
///
/// Each `from -> to` pair is independent: a pair that fails is recorded as a
/// diagnostic and the remaining pairs still run.
#[derive(Debug, Clone)]
pub struct CopyPlugin {
    config: CopyConfig,
    root: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CopyOutcome {
    Copied(usize),
    Skipped,
}

impl CopyPlugin {
    pub const NAME: &'static str = "copy";

    pub fn new(config: CopyConfig) -> Self {
        Self {
            config,
            root: PathBuf::new(),
        }
    }

    /// Resolve relative resource paths against `root` instead of the working directory.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }
}

#[async_trait]
impl Plugin for CopyPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn writes_output(&self) -> bool {
        true
    }

    async fn emit_complete(&self, ctx: &EmitContext) -> anyhow::Result<()> {
        if self.config.resources.is_empty() {
            return Ok(());
        }

        let pairs: Vec<(PathBuf, PathBuf)> = self
            .config
            .resources
            .iter()
            .map(|pair| {
                (
                    resolve_from(&self.root, &pair.from),
                    resolve_from(&self.root, &pair.to),
                )
            })
            .collect();
        let overwrite = self.config.overwrite;

        let outcomes = tokio::task::spawn_blocking(move || {
            pairs
                .into_iter()
                .map(|(from, to)| {
                    let outcome = copy_resource(&from, &to, overwrite);
                    (from, to, outcome)
                })
                .collect::<Vec<_>>()
        })
        .await?;

        let mut copied = 0;
        for (from, to, outcome) in outcomes {
            match outcome {
                Ok(CopyOutcome::Copied(files)) => {
                    copied += files;
                    tracing::debug!("[copy] {} -> {}", from.display(), to.display());
                }
                Ok(CopyOutcome::Skipped) => {
                    tracing::debug!("[copy] {} exists, skipping", to.display());
                }
                Err(e) => report(
                    &ctx.diagnostics,
                    self.config.verbose,
                    Diagnostic::warning(
                        Self::NAME,
                        format!("could not copy to '{}': {}", to.display(), e),
                    )
                    .with_id(from.display().to_string()),
                ),
            }
        }

        if self.config.verbose {
            tracing::info!("[copy] copied {copied} files");
        }
        Ok(())
    }
}

fn copy_resource(from: &Path, to: &Path, overwrite: bool) -> io::Result<CopyOutcome> {
    if !overwrite && to.exists() {
        return Ok(CopyOutcome::Skipped);
    }

    if !fs::metadata(from)?.is_dir() {
        copy_file(from, to)?;
        return Ok(CopyOutcome::Copied(1));
    }

    let mut files = 0;
    for entry in WalkDir::new(from).follow_links(true) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(io::Error::other)?;
        let dest = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else {
            copy_file(entry.path(), &dest)?;
            files += 1;
        }
    }
    Ok(CopyOutcome::Copied(files))
}

fn copy_file(from: &Path, to: &Path) -> io::Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(from, to).map(|_| ())
}

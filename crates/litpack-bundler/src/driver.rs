//! Hook dispatch.
//!
//! - `resolve_id`: externals first, then plugins in order; first answer wins.
//! - `transform`: folded in plugin order, each plugin sees the previous output.
//! - `before_write`: only when the writer puts the bundle on disk; sequential,
//!   in plugin order, and the first failure aborts the build.
//! - `emit_complete`: only for written builds; every hook runs concurrently
//!   with the bundle write and with each other, and all of them are awaited.

use std::path::PathBuf;
use std::sync::Arc;

use futures::future::join_all;

use crate::barrier::{output_stages, write_barrier};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::manifest::Bundle;
use crate::module::{SourceModule, TransformedModule};
use crate::output::OutputWriter;
use crate::output::writer::validate_and_normalize_dir;
use crate::plugin::{EmitContext, PluginContext, ResolvedId, SharedPlugin, WriteContext};
use crate::{Error, HookFailure, Result};

/// How the finished bundle is emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishOptions {
    pub output_dir: PathBuf,
    /// `false` for a generate-only build: nothing is written and no
    /// `emit_complete` hook runs.
    pub is_write: bool,
    pub overwrite: bool,
}

impl FinishOptions {
    pub fn write_to(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            is_write: true,
            overwrite: true,
        }
    }

    pub fn dry_run(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            is_write: false,
            ..Self::write_to(output_dir)
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// What a finished build produced.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Absolute paths of the bundle files written (empty for dry builds).
    pub written: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct PluginDriver {
    plugins: Vec<SharedPlugin>,
    externals: Vec<String>,
    ctx: PluginContext,
}

impl PluginDriver {
    pub fn new(plugins: Vec<SharedPlugin>, externals: Vec<String>) -> Self {
        Self {
            plugins,
            externals,
            ctx: PluginContext::default(),
        }
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn diagnostics(&self) -> &Arc<Diagnostics> {
        &self.ctx.diagnostics
    }

    /// `true` for a configured external or a subpath of one (`lit/decorators.js`).
    pub fn is_external(&self, specifier: &str) -> bool {
        self.externals.iter().any(|external| {
            specifier == external
                || specifier
                    .strip_prefix(external.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    pub fn resolve_id(&self, specifier: &str, importer: Option<&str>) -> Result<Option<ResolvedId>> {
        if self.is_external(specifier) {
            return Ok(Some(ResolvedId::external(specifier)));
        }

        for plugin in &self.plugins {
            let resolved = plugin
                .resolve_id(&self.ctx, specifier, importer)
                .map_err(|e| Error::Plugin {
                    plugin: plugin.name().to_string(),
                    message: format!("{e:#}"),
                })?;
            if let Some(resolved) = resolved {
                tracing::trace!(plugin = plugin.name(), specifier, id = %resolved.id, "resolved");
                return Ok(Some(resolved));
            }
        }

        Ok(None)
    }

    pub fn transform(&self, module: SourceModule) -> Result<TransformedModule> {
        let SourceModule { id, mut code } = module;
        let mut maps = Vec::new();

        for plugin in &self.plugins {
            let output = plugin
                .transform(&self.ctx, &code, &id)
                .map_err(|e| Error::Transform {
                    plugin: plugin.name().to_string(),
                    id: id.clone(),
                    message: format!("{e:#}"),
                })?;

            if let Some(output) = output {
                tracing::trace!(plugin = plugin.name(), id = %id, "transformed");
                code = output.code;
                maps.extend(output.map);
            }
        }

        Ok(TransformedModule { id, code, maps })
    }

    /// Write `bundle` with `writer` and run every `emit_complete` hook.
    ///
    /// # Errors
    ///
    /// A failed write is returned as is. Otherwise, if any hook failed, all
    /// hook failures are returned together as [`Error::EmitHooks`].
    pub async fn finish(
        &self,
        bundle: Arc<Bundle>,
        options: &FinishOptions,
        writer: &dyn OutputWriter,
    ) -> Result<BuildReport> {
        if !options.is_write {
            tracing::debug!("generate-only build, skipping write and emit hooks");
            return Ok(BuildReport {
                written: Vec::new(),
                diagnostics: self.ctx.diagnostics.snapshot(),
            });
        }

        let output_dir = validate_and_normalize_dir(&options.output_dir)?;
        if writer.writes_files() {
            self.before_write(&output_dir).await?;
        }

        let (signal, barrier) = write_barrier();
        let (guards, stages) =
            output_stages(self.plugins.iter().filter(|p| p.writes_output()).count());
        let mut guards = guards.into_iter();
        let ctx = EmitContext {
            manifest: Arc::new(bundle.manifest.clone()),
            output_dir: output_dir.clone(),
            barrier,
            stages,
            diagnostics: Arc::clone(&self.ctx.diagnostics),
        };

        let write = async {
            match writer
                .write(Arc::clone(&bundle), &output_dir, options.overwrite)
                .await
            {
                Ok(written) => {
                    let files = written.files.clone();
                    tracing::debug!(files = files.len(), dir = %output_dir.display(), "bundle written");
                    signal.complete(written);
                    Ok(files)
                }
                Err(err) => {
                    signal.fail(err.to_string());
                    Err(err)
                }
            }
        };

        let hooks = join_all(self.plugins.iter().map(|plugin| {
            let guard = if plugin.writes_output() {
                guards.next()
            } else {
                None
            };
            let ctx = &ctx;
            async move {
                let outcome = plugin.emit_complete(ctx).await;
                drop(guard);
                (plugin.name().to_string(), outcome)
            }
        }));

        let (written, outcomes) = futures::join!(write, hooks);

        let failures: Vec<HookFailure> = outcomes
            .into_iter()
            .filter_map(|(plugin, outcome)| {
                outcome.err().map(|e| HookFailure {
                    plugin,
                    message: format!("{e:#}"),
                })
            })
            .collect();

        let written = match written {
            Ok(files) => files,
            Err(err) => {
                for failure in &failures {
                    tracing::debug!("{failure}");
                }
                return Err(err);
            }
        };

        if !failures.is_empty() {
            return Err(Error::EmitHooks(failures));
        }

        Ok(BuildReport {
            written,
            diagnostics: self.ctx.diagnostics.snapshot(),
        })
    }
}

impl PluginDriver {
    async fn before_write(&self, output_dir: &std::path::Path) -> Result<()> {
        let ctx = WriteContext {
            output_dir: output_dir.to_path_buf(),
            diagnostics: Arc::clone(&self.ctx.diagnostics),
        };
        for plugin in &self.plugins {
            plugin
                .before_write(&ctx)
                .await
                .map_err(|e| Error::Plugin {
                    plugin: plugin.name().to_string(),
                    message: format!("{e:#}"),
                })?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for PluginDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginDriver")
            .field("plugins", &self.plugin_names())
            .field("externals", &self.externals)
            .finish()
    }
}

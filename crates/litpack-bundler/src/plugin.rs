//! The plugin contract.
//!
//! A plugin is a name plus up to four hooks. Every hook has a default body
//! that skips, so a plugin only implements what it takes part in, and a hook
//! that is absent behaves exactly like one that returns "skip".

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use oxc_sourcemap::SourceMap;

use crate::Result;
use crate::barrier::{StageBarrier, WriteBarrier, WrittenFiles};
use crate::diagnostics::Diagnostics;
use crate::manifest::BundleManifest;

/// Outcome of a successful `resolve_id` hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedId {
    pub id: String,
    /// Leave the import as-is in the output instead of bundling it.
    pub external: bool,
}

impl ResolvedId {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            external: false,
        }
    }

    pub fn external(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            external: true,
        }
    }
}

/// Replacement code for a module, with an optional map back to its input.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub code: String,
    pub map: Option<SourceMap>,
}

impl TransformOutput {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            map: None,
        }
    }

    pub fn with_map(mut self, map: SourceMap) -> Self {
        self.map = Some(map);
        self
    }
}

/// State shared with `resolve_id` and `transform` hooks.
#[derive(Debug, Clone, Default)]
pub struct PluginContext {
    pub diagnostics: Arc<Diagnostics>,
}

/// State shared with `emit_complete` hooks.
#[derive(Debug, Clone)]
pub struct EmitContext {
    pub manifest: Arc<BundleManifest>,
    /// Absolute output directory.
    pub output_dir: PathBuf,
    /// Resolves once every bundle file has been written.
    pub barrier: WriteBarrier,
    /// Resolves once every plugin whose [`Plugin::writes_output`] is `true`
    /// has returned from `emit_complete`.
    pub stages: StageBarrier,
    pub diagnostics: Arc<Diagnostics>,
}

impl EmitContext {
    /// Wait for the bundle write and for every file-writing stage.
    ///
    /// Must not be awaited by a plugin that reports `writes_output`, since it
    /// would wait on itself.
    ///
    /// # Errors
    ///
    /// `Error::WriteBarrier` if the bundle write failed.
    pub async fn wait_for_outputs(&self) -> Result<Arc<WrittenFiles>> {
        let written = self.barrier.wait().await?;
        self.stages.wait().await;
        Ok(written)
    }
}

/// State shared with `before_write` hooks.
#[derive(Debug, Clone)]
pub struct WriteContext {
    /// Absolute output directory the bundle is about to be written to.
    pub output_dir: PathBuf,
    pub diagnostics: Arc<Diagnostics>,
}

#[async_trait]
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    /// Resolve `specifier` imported from `importer`. `None` defers to the next
    /// plugin and finally to default resolution.
    fn resolve_id(
        &self,
        _ctx: &PluginContext,
        _specifier: &str,
        _importer: Option<&str>,
    ) -> anyhow::Result<Option<ResolvedId>> {
        Ok(None)
    }

    /// Rewrite the code of module `id`. `None` passes the code on unchanged.
    fn transform(
        &self,
        _ctx: &PluginContext,
        _code: &str,
        _id: &str,
    ) -> anyhow::Result<Option<TransformOutput>> {
        Ok(None)
    }

    /// Runs in plugin order before the bundle is written, only when the
    /// writer puts files on disk itself. An error aborts the build.
    async fn before_write(&self, _ctx: &WriteContext) -> anyhow::Result<()> {
        Ok(())
    }

    /// `true` if `emit_complete` writes files of its own. Stages that read the
    /// output directory wait for these through [`EmitContext::wait_for_outputs`].
    fn writes_output(&self) -> bool {
        false
    }

    /// Runs once per written build, concurrently with the bundle write and
    /// every other plugin's `emit_complete`. Work that reads output files must
    /// await `ctx.barrier` first.
    async fn emit_complete(&self, _ctx: &EmitContext) -> anyhow::Result<()> {
        Ok(())
    }
}

pub type SharedPlugin = Arc<dyn Plugin>;

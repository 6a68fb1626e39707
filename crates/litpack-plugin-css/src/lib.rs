//! Stylesheet imports for litpack
//!
//! Lets modules `import styles from "./button.scss"`. The stylesheet is run
//! through a chain of [`StyleProcessor`]s (grass for `.scss`, then
//! lightningcss, by default) and
//! wrapped as a JavaScript module whose default export is the CSS text.
//! Files listed in `global_file_names` are also injected into
//! `document.head` when the module is evaluated.
//!
//! ## Example Usage
//!
//! ```rust
//! use litpack_bundler::{Plugin, PluginContext};
//! use litpack_config::StyleConfig;
//! use litpack_plugin_css::StyleImportPlugin;
//!
//! let plugin = StyleImportPlugin::new(StyleConfig::default().with_minify(true));
//! let out = plugin
//!     .transform(&PluginContext::default(), "p { color: red; }", "src/a.css")
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(out.code, "export default `p{color:red}`;\n");
//! ```

use std::path::Path;
use std::sync::Arc;

use litpack_bundler::sourcemap::{Rewrite, apply_rewrites};
use litpack_bundler::diagnostics::{Diagnostic, report};
use litpack_bundler::{Plugin, PluginContext, ResolvedId, TransformOutput};
use litpack_config::StyleConfig;
use path_clean::PathClean;

mod error;
mod processor;
mod wrap;

pub use error::{Result, StyleError};
pub use processor::{LightningCssProcessor, Processed, ScssProcessor, StyleProcessor};
pub use wrap::{default_module, escape_template, global_module};

/// Resolves and transforms stylesheet imports.
pub struct StyleImportPlugin {
    config: StyleConfig,
    processors: Vec<Arc<dyn StyleProcessor>>,
}

impl StyleImportPlugin {
    pub const NAME: &'static str = "import-styles";

    /// Create the plugin with the grass and lightningcss processors.
    pub fn new(config: StyleConfig) -> Self {
        let processors: Vec<Arc<dyn StyleProcessor>> = vec![
            Arc::new(ScssProcessor),
            Arc::new(LightningCssProcessor::new(config.minify)),
        ];
        Self { config, processors }
    }

    /// Replace the processor chain. An empty chain passes CSS through as-is.
    pub fn with_processors(mut self, processors: Vec<Arc<dyn StyleProcessor>>) -> Self {
        self.processors = processors;
        self
    }

    fn handles(&self, id: &str) -> bool {
        self.config
            .file_extensions
            .iter()
            .any(|ext| id.ends_with(ext.as_str()))
    }

    fn is_global(&self, id: &str) -> bool {
        self.config
            .global_file_names
            .iter()
            .any(|name| id.ends_with(name.as_str()))
    }

    fn wrap(&self, css: &str, id: &str) -> String {
        if self.is_global(id) {
            global_module(css)
        } else {
            default_module(css)
        }
    }

    /// Run the processor chain over `css`, collecting every processor's warnings.
    pub fn process(&self, css: &str, id: &str) -> Result<Processed> {
        let mut current = Processed::from(css.to_string());
        for processor in &self.processors {
            let step = processor.process(&current.css, id)?;
            tracing::trace!(processor = processor.name(), id, "processed stylesheet");
            current.css = step.css;
            current
                .warnings
                .extend(step.warnings.into_iter().map(|w| format!("{}: {w}", processor.name())));
        }
        Ok(current)
    }
}

impl std::fmt::Debug for StyleImportPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleImportPlugin")
            .field("config", &self.config)
            .field(
                "processors",
                &self.processors.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Plugin for StyleImportPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn resolve_id(
        &self,
        _ctx: &PluginContext,
        specifier: &str,
        importer: Option<&str>,
    ) -> anyhow::Result<Option<ResolvedId>> {
        let Some(importer) = importer else {
            return Ok(None);
        };
        if !self.handles(specifier) {
            return Ok(None);
        }
        let dir = Path::new(importer).parent().unwrap_or(Path::new(""));
        let resolved = dir.join(specifier).clean();
        Ok(Some(ResolvedId::new(resolved.to_string_lossy())))
    }

    fn transform(
        &self,
        ctx: &PluginContext,
        code: &str,
        id: &str,
    ) -> anyhow::Result<Option<TransformOutput>> {
        if !self.handles(id) {
            return Ok(None);
        }

        if code.trim().is_empty() {
            return Ok(Some(TransformOutput::new(self.wrap("", id))));
        }

        let Processed { css, warnings } = self.process(code, id)?;
        for warning in warnings {
            report(
                &ctx.diagnostics,
                self.config.verbose,
                Diagnostic::warning(Self::NAME, format!("skipped part of the stylesheet: {warning}"))
                    .with_id(id),
            );
        }

        let module = self.wrap(&css, id);
        tracing::debug!("[{id}] {} -> {} bytes", code.len(), css.len());

        // The whole stylesheet maps to the start of the original file.
        let output = apply_rewrites(id, code, vec![Rewrite::new(0..code.len(), module)])
            .map_err(StyleError::from)?;
        Ok(Some(TransformOutput::new(output.code).with_map(output.map)))
    }
}

//! Markup-literal minification for litpack
//!
//! Finds `` html`...` `` tagged templates in JavaScript and TypeScript modules
//! and minifies the markup between the interpolations. Interpolated
//! expressions are never touched; each static text part is rewritten in
//! place and a source map back to the original module is produced.
//!
//! ## Example Usage
//!
//! ```rust
//! use litpack_config::LitConfig;
//! use litpack_plugin_lit::minify_literals;
//! use litpack_plugin_lit::HtmlMinifier;
//!
//! let source = "const view = (name) => html`<p>   Hello ${name}   </p>`;";
//! let config = LitConfig::default();
//! let out = minify_literals(source, "view.js", &config.matcher, &HtmlMinifier::default()).unwrap();
//! assert_eq!(out.code, "const view = (name) => html`<p> Hello ${name} </p>`;");
//! ```

use std::sync::Arc;

use litpack_bundler::diagnostics::{Diagnostic, report};
use litpack_bundler::{IdFilter, Plugin, PluginContext, TransformOutput};
use litpack_config::LitConfig;

mod collect;
mod error;
mod matcher;
mod minifier;
mod transform;

pub use collect::MarkupLiteral;
pub use error::{LitError, LitIssue, Result};
pub use matcher::TagMatcher;
pub use minifier::{HtmlMinifier, MarkupMinifier};
pub use transform::{LitOutput, minify_literals};

/// Transform plugin that minifies markup literals.
pub struct LitMinifyPlugin {
    config: LitConfig,
    filter: IdFilter,
    minifier: Arc<dyn MarkupMinifier>,
}

impl LitMinifyPlugin {
    pub const NAME: &'static str = "minify-lit-html";

    /// Create the plugin with the default [`HtmlMinifier`].
    ///
    /// Fails when an include/exclude or ignored-fragment pattern does not
    /// compile.
    pub fn new(config: LitConfig) -> Result<Self> {
        let filter = IdFilter::new(&config.include, &config.exclude)?;
        let minifier = Arc::new(HtmlMinifier::new(&config.minifier)?);
        Ok(Self {
            config,
            filter,
            minifier,
        })
    }

    /// Replace the markup minifier.
    pub fn with_minifier(mut self, minifier: Arc<dyn MarkupMinifier>) -> Self {
        self.minifier = minifier;
        self
    }
}

impl std::fmt::Debug for LitMinifyPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LitMinifyPlugin")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Plugin for LitMinifyPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn transform(
        &self,
        ctx: &PluginContext,
        code: &str,
        id: &str,
    ) -> anyhow::Result<Option<TransformOutput>> {
        if !self.filter.matches(id) {
            return Ok(None);
        }

        let output = minify_literals(code, id, &self.config.matcher, self.minifier.as_ref())?;
        for issue in &output.issues {
            report(
                &ctx.diagnostics,
                self.config.verbose,
                Diagnostic::warning(Self::NAME, issue.to_string()).with_id(id),
            );
        }

        if !output.is_changed() {
            return Ok(None);
        }
        tracing::debug!(
            "[{id}] minified {} markup literal(s), {} part(s) rewritten",
            output.matched,
            output.rewritten
        );
        Ok(Some(TransformOutput::new(output.code).with_map(output.map)))
    }
}

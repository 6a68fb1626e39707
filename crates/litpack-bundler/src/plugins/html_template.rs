use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use litpack_config::HtmlConfig;

use super::resolve_from;
use crate::diagnostics::{Diagnostic, report};
use crate::filter::IdFilter;
use crate::output::write_atomic;
use crate::plugin::{EmitContext, Plugin};
use crate::{Error, Result};

/// Injects a `<script>` tag per emitted file into an HTML template and writes
/// the result to the target path.
#[derive(Debug, Clone)]
pub struct HtmlTemplatePlugin {
    template: PathBuf,
    target: PathBuf,
    filter: IdFilter,
    include: Vec<String>,
    exclude: Vec<String>,
    script_type: String,
    verbose: bool,
}

/// Result of [`inject_scripts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Injected {
    pub html: String,
    /// `false` if the template had no `</body>` and the tags were appended.
    pub body_found: bool,
}

/// Insert one script tag per file name before the last `</body>`.
pub fn inject_scripts(template: &str, file_names: &[&str], script_type: &str) -> Injected {
    let tags: String = file_names
        .iter()
        .map(|file| format!("<script src=\"{file}\" type=\"{script_type}\"></script>\n"))
        .collect();

    match template.rfind("</body>") {
        Some(index) => Injected {
            html: format!("{}{}{}", &template[..index], tags, &template[index..]),
            body_found: true,
        },
        None => Injected {
            html: format!("{template}{tags}"),
            body_found: false,
        },
    }
}

impl HtmlTemplatePlugin {
    pub const NAME: &'static str = "html-template";

    /// # Errors
    ///
    /// `Error::InvalidConfig` if the template or target is missing, or a
    /// filter pattern does not compile.
    pub fn new(config: HtmlConfig) -> Result<Self> {
        let (Some(template), Some(target)) = (config.template, config.target) else {
            return Err(Error::InvalidConfig(
                "the html template stage needs both a template and a target".to_string(),
            ));
        };

        Ok(Self {
            template,
            target,
            filter: IdFilter::new(&config.include, &config.exclude)?,
            include: config.include,
            exclude: config.exclude,
            script_type: config.script_type,
            verbose: config.verbose,
        })
    }

    /// Resolve relative template and target paths against `root`.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        self.template = resolve_from(&root, &self.template);
        self.target = resolve_from(&root, &self.target);
        self
    }

    pub fn target(&self) -> &std::path::Path {
        &self.target
    }
}

#[async_trait]
impl Plugin for HtmlTemplatePlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn writes_output(&self) -> bool {
        true
    }

    async fn emit_complete(&self, ctx: &EmitContext) -> anyhow::Result<()> {
        let all: Vec<&str> = ctx.manifest.file_names().collect();
        let included: Vec<&str> = all
            .iter()
            .copied()
            .filter(|name| self.filter.matches(name))
            .collect();

        if included.is_empty() {
            report(
                &ctx.diagnostics,
                self.verbose,
                Diagnostic::warning(
                    Self::NAME,
                    format!(
                        "no files were included; include is {:?}, exclude is {:?}, emitted files are [{}]",
                        self.include,
                        self.exclude,
                        all.join(", ")
                    ),
                )
                .with_id(self.target.display().to_string()),
            );
        }

        let template = tokio::fs::read_to_string(&self.template)
            .await
            .with_context(|| format!("could not read template '{}'", self.template.display()))?;

        let injected = inject_scripts(&template, &included, &self.script_type);
        if !injected.body_found {
            report(
                &ctx.diagnostics,
                self.verbose,
                Diagnostic::warning(Self::NAME, "template has no </body>; scripts appended at the end")
                    .with_id(self.template.display().to_string()),
            );
        }

        let target = self.target.clone();
        tokio::task::spawn_blocking(move || write_atomic(&target, injected.html.as_bytes()))
            .await?
            .with_context(|| format!("could not write '{}'", self.target.display()))?;

        tracing::debug!(
            "[html-template] injected {} scripts into {}",
            included.len(),
            self.target.display()
        );
        Ok(())
    }
}

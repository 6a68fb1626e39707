use std::path::{Path, PathBuf};

use litpack_config::ReplaceConfig;
use path_clean::PathClean;

use super::resolve_from;
use crate::plugin::{Plugin, PluginContext, ResolvedId};

/// Resolves imports of one source file to another file.
///
/// A relative specifier matches a pair when it resolves to `from`, with or
/// without `from`'s extension. Bare specifiers are left alone.
#[derive(Debug, Clone)]
pub struct ReplacePlugin {
    pairs: Vec<(PathBuf, PathBuf)>,
    root: PathBuf,
}

impl ReplacePlugin {
    pub const NAME: &'static str = "replace";

    pub fn new(config: ReplaceConfig) -> Self {
        Self {
            pairs: config
                .resources
                .into_iter()
                .map(|pair| (pair.from.clean(), pair.to.clean()))
                .collect(),
            root: PathBuf::new(),
        }
    }

    /// Resolve relative paths (pairs and importers) against `root`.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        self.pairs = self
            .pairs
            .into_iter()
            .map(|(from, to)| (resolve_from(&root, &from), resolve_from(&root, &to)))
            .collect();
        self.root = root;
        self
    }

    /// The replacement for `path`, if any pair matches it.
    pub fn replacement_for(&self, path: &Path) -> Option<&Path> {
        self.pairs
            .iter()
            .find(|(from, _)| path == from || path == from.with_extension(""))
            .map(|(_, to)| to.as_path())
    }
}

impl Plugin for ReplacePlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn resolve_id(
        &self,
        _ctx: &PluginContext,
        specifier: &str,
        importer: Option<&str>,
    ) -> anyhow::Result<Option<ResolvedId>> {
        let candidate = if Path::new(specifier).is_absolute() {
            PathBuf::from(specifier)
        } else if specifier.starts_with("./") || specifier.starts_with("../") {
            let Some(importer) = importer else {
                return Ok(None);
            };
            let dir = Path::new(importer).parent().unwrap_or(Path::new(""));
            resolve_from(&self.root, &dir.join(specifier))
        } else {
            return Ok(None);
        };

        let candidate = candidate.clean();
        Ok(self.replacement_for(&candidate).map(|to| {
            tracing::debug!("[replace] {} -> {}", candidate.display(), to.display());
            ResolvedId::new(to.to_string_lossy())
        }))
    }
}

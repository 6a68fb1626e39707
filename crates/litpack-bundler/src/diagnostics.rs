//! Recoverable per-unit failures collected during a build.
//!
//! A diagnostic never stops the build. Plugins record one, log it, and carry
//! on with the next module, file, or copy pair.

use std::fmt;

use parking_lot::Mutex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub plugin: String,
    /// Module id or file path the diagnostic is about.
    pub id: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            plugin: plugin.into(),
            id: None,
            message: message.into(),
        }
    }

    pub fn error(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            ..Self::warning(plugin, message)
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "[{}] {}: {}", self.plugin, id, self.message),
            None => write!(f, "[{}] {}", self.plugin, self.message),
        }
    }
}

/// Shared, append-only diagnostic sink.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Mutex<Vec<Diagnostic>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, diagnostic: Diagnostic) {
        self.entries.lock().push(diagnostic);
    }

    /// Copy of everything recorded so far, in insertion order.
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// Record a diagnostic and log it at `warn` when `verbose`, else at `debug`.
pub fn report(diagnostics: &Diagnostics, verbose: bool, diagnostic: Diagnostic) {
    if verbose {
        tracing::warn!("{diagnostic}");
    } else {
        tracing::debug!("{diagnostic}");
    }
    diagnostics.push(diagnostic);
}

//! Error types for markup-literal minification

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LitError>;

#[derive(Error, Debug, Diagnostic)]
pub enum LitError {
    /// The markup minifier rejected its input.
    #[error("markup minification failed: {0}")]
    #[diagnostic(code(litpack::lit::minify_failed))]
    Minify(String),

    /// A configured pattern is not a valid regex.
    #[error("invalid pattern '{pattern}': {message}")]
    #[diagnostic(
        code(litpack::lit::invalid_pattern),
        help("Check the lit.minifier.ignore_custom_fragments patterns")
    )]
    InvalidPattern { pattern: String, message: String },

    /// Filter construction or rewrite application failed.
    #[error(transparent)]
    #[diagnostic(code(litpack::lit::bundler))]
    Bundler(#[from] litpack_bundler::Error),
}

/// A recoverable problem that left (part of) a module untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LitIssue {
    /// The module could not be parsed at all; its code is returned as-is.
    #[error("could not parse module: {0}")]
    Parse(String),

    #[error("{tag}`...` at byte {offset}: placeholders or template syntax did not survive minification")]
    PlaceholderMismatch { tag: String, offset: usize },

    #[error("{tag}`...` at byte {offset}: {message}")]
    Minify {
        tag: String,
        offset: usize,
        message: String,
    },

    #[error("{tag}`...` at byte {offset}: template text does not line up with the source")]
    UnalignedQuasi { tag: String, offset: usize },
}

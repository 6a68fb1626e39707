use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StyleError>;

#[derive(Error, Debug, Diagnostic)]
pub enum StyleError {
    #[error("failed to parse stylesheet {id}: {message}")]
    #[diagnostic(code(litpack::css::parse_failed))]
    Parse { id: String, message: String },

    #[error("failed to minify stylesheet {id}: {message}")]
    #[diagnostic(code(litpack::css::minify_failed))]
    Minify { id: String, message: String },

    #[error("failed to print stylesheet {id}: {message}")]
    #[diagnostic(code(litpack::css::print_failed))]
    Print { id: String, message: String },

    /// A user-supplied processor failed.
    #[error("style processor '{processor}' failed on {id}: {message}")]
    #[diagnostic(
        code(litpack::css::processor_failed),
        help("Processors run in the order they were added; check the failing one's input")
    )]
    Processor {
        processor: String,
        id: String,
        message: String,
    },

    #[error(transparent)]
    #[diagnostic(code(litpack::css::bundler))]
    Bundler(#[from] litpack_bundler::Error),
}

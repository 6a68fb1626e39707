use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(code(litpack::config))]
    Config(#[from] litpack_config::ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Bundler(#[from] litpack_bundler::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Lit(#[from] litpack_plugin_lit::LitError),

    #[error("failed to read module {path}: {source}")]
    #[diagnostic(code(litpack::read_module))]
    ReadModule {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

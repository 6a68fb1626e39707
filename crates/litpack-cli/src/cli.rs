//! Command-line interface definition.
//!
//! - `litpack transform <file>` - run a module through the transform hooks
//! - `litpack emit --manifest <json>` - run post-emission plugins over a
//!   bundle another tool already wrote
//! - `litpack variant` - print the build variant selected by the environment

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use litpack_config::BuildVariant;

/// litpack - build pipeline for lit-html applications
#[derive(Parser, Debug)]
#[command(
    name = "litpack",
    version,
    about = "Build pipeline for lit-html applications and libraries",
    long_about = "litpack runs the plugins around an external bundler: stylesheet imports,\n\
                  template minification, resource copying, HTML entry injection and\n\
                  compression. The plugin set is picked from LITPACK_WATCH and NODE_ENV."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Config file to use instead of litpack.toml / package.json discovery
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project root (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}

impl GlobalArgs {
    pub fn root(&self) -> PathBuf {
        self.cwd.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a module after running every transform hook
    Transform(TransformArgs),

    /// Run post-emission plugins over an already written bundle
    Emit(EmitArgs),

    /// Print the build variant selected by the environment
    Variant(VariantArgs),
}

#[derive(Args, Debug, Clone)]
pub struct TransformArgs {
    /// Module to transform
    pub file: PathBuf,

    /// Write the source map to this file
    #[arg(long, value_name = "FILE")]
    pub map: Option<PathBuf>,

    /// Override the variant selected from the environment
    #[arg(long, value_parser = parse_variant)]
    pub variant: Option<BuildVariant>,
}

#[derive(Args, Debug, Clone)]
pub struct EmitArgs {
    /// Bundle manifest JSON: `{ "<chunk>": { "fileName": "...", "kind": "entry" } }`
    #[arg(long, value_name = "FILE")]
    pub manifest: PathBuf,

    /// Skip writing and every post-emission plugin
    #[arg(long)]
    pub dry: bool,

    /// Override the variant selected from the environment
    #[arg(long, value_parser = parse_variant)]
    pub variant: Option<BuildVariant>,
}

#[derive(Args, Debug, Clone)]
pub struct VariantArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_variant(value: &str) -> std::result::Result<BuildVariant, String> {
    value.parse().map_err(|e: litpack_config::ConfigError| e.to_string())
}

//! litpack CLI entry point.
//!
//! Parses arguments, sets up logging and dispatches to a command.

use clap::Parser;
use litpack_cli::{cli, commands, error, logger, ui};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let settings = commands::project_settings(&args.global);
    logger::init_logger(
        args.global.verbose,
        args.global.quiet,
        args.global.no_color || settings.no_color,
        settings.log_level.as_deref(),
    );
    ui::init_colors(args.global.no_color || settings.no_color);

    let result = match args.command {
        cli::Command::Transform(transform_args) => {
            commands::transform_execute(&args.global, transform_args).await
        }
        cli::Command::Emit(emit_args) => commands::emit_execute(&args.global, emit_args).await,
        cli::Command::Variant(variant_args) => commands::variant_execute(variant_args),
    };

    result.map_err(error::cli_error_to_miette)
}

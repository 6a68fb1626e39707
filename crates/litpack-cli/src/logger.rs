//! Logging for the litpack CLI.
//!
//! Level selection, first match wins:
//! 1. `--verbose`: debug for litpack crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`
//! 4. `settings.log_level` from the project config
//! 5. info for litpack crates

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LITPACK_CRATES: [&str; 6] = [
    "litpack",
    "litpack_cli",
    "litpack_config",
    "litpack_bundler",
    "litpack_plugin_lit",
    "litpack_plugin_css",
];

/// Filter directive setting every litpack crate to `level`.
pub fn crate_directives(level: &str) -> String {
    LITPACK_CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn build_filter(verbose: bool, quiet: bool, config_level: Option<&str>) -> EnvFilter {
    if verbose {
        EnvFilter::new(crate_directives("debug"))
    } else if quiet {
        EnvFilter::new(crate_directives("error"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(crate_directives(config_level.unwrap_or("info")))
        })
    }
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool, config_level: Option<&str>) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .compact();

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(build_filter(verbose, quiet, config_level))
        .with(fmt_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_cover_every_crate() {
        let directives = crate_directives("warn");
        assert!(directives.starts_with("litpack=warn,"));
        assert!(directives.contains("litpack_plugin_css=warn"));
        assert_eq!(directives.split(',').count(), LITPACK_CRATES.len());
    }

    #[test]
    fn filters_build_for_every_mode() {
        let _verbose = build_filter(true, false, None);
        let _quiet = build_filter(false, true, None);
        let _configured = build_filter(false, false, Some("trace"));
    }
}

//! Command implementations.

mod emit;
mod transform;
mod variant;

pub use emit::execute as emit_execute;
pub use transform::execute as transform_execute;
pub use variant::execute as variant_execute;

use litpack::{BuildVariant, Pipeline};
use litpack_config::{ConfigDiscovery, GlobalSettings};

use crate::cli::GlobalArgs;
use crate::error::Result;

/// The `[settings]` block of the project config, or defaults if there is none
/// or it does not load. Errors surface again when the command loads the
/// config for real.
pub fn project_settings(global: &GlobalArgs) -> GlobalSettings {
    let discovery = ConfigDiscovery::new(global.root());
    let loaded = match &global.config {
        Some(path) => discovery.load_from(path),
        None => discovery.load_or_default(),
    };
    loaded.map(|config| config.settings).unwrap_or_default()
}

pub(crate) fn load_pipeline(global: &GlobalArgs, variant: Option<BuildVariant>) -> Result<Pipeline> {
    let variant = variant.unwrap_or_else(BuildVariant::from_process_env);
    tracing::debug!(%variant, "loading pipeline");
    Ok(Pipeline::load(
        global.root(),
        global.config.as_deref(),
        variant,
    )?)
}

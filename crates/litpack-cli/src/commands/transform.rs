use std::io::Write;

use litpack_bundler::sourcemap::empty_sourcemap;

use crate::cli::{GlobalArgs, TransformArgs};
use crate::error::{CliError, Result};
use crate::ui;

/// Run `args.file` through the transform hooks and print the result.
pub async fn execute(global: &GlobalArgs, args: TransformArgs) -> Result<()> {
    let path = if args.file.is_absolute() {
        args.file.clone()
    } else {
        global.root().join(&args.file)
    };
    if !path.is_file() {
        return Err(CliError::FileNotFound(path));
    }

    let pipeline = super::load_pipeline(global, args.variant)?;
    let module = pipeline.transform_file(&path).await?;

    let diagnostics = pipeline.driver().diagnostics().snapshot();
    for diagnostic in &diagnostics {
        ui::warning(&diagnostic.to_string());
    }

    if let Some(map_path) = &args.map {
        if module.maps.len() > 1 {
            ui::warning(&format!(
                "{} transforms produced maps; writing the last one",
                module.maps.len()
            ));
        }
        let map = module.maps.last().cloned().unwrap_or_else(empty_sourcemap);
        tokio::fs::write(map_path, map.to_json_string())
            .await
            .map_err(|e| CliError::io("write", map_path, e))?;
        tracing::debug!("wrote source map to {}", map_path.display());
    }

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(module.code.as_bytes())
        .map_err(|e| CliError::io("print", &args.file, e))?;
    Ok(())
}

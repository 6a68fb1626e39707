use litpack_bundler::{Bundle, BundleManifest, PrewrittenOutput, Severity};

use crate::cli::{EmitArgs, GlobalArgs};
use crate::error::{CliError, Result};
use crate::ui;

/// Run the post-emission plugins over a bundle already in the output
/// directory.
pub async fn execute(global: &GlobalArgs, args: EmitArgs) -> Result<()> {
    let manifest_path = if args.manifest.is_absolute() {
        args.manifest.clone()
    } else {
        global.root().join(&args.manifest)
    };
    let json = tokio::fs::read_to_string(&manifest_path)
        .await
        .map_err(|e| CliError::io("read", &manifest_path, e))?;
    let manifest = BundleManifest::from_json(&json)?;

    let pipeline = super::load_pipeline(global, args.variant)?;
    ui::info(&format!(
        "{} build, {} plugin(s), {} file(s)",
        pipeline.variant(),
        pipeline.driver().plugin_names().len(),
        manifest.len()
    ));

    let bundle = Bundle {
        manifest,
        files: Vec::new(),
    };
    let report = pipeline.emit(bundle, args.dry, &PrewrittenOutput).await?;

    for diagnostic in &report.diagnostics {
        match diagnostic.severity {
            Severity::Warning => ui::warning(&diagnostic.to_string()),
            Severity::Error => ui::error(&diagnostic.to_string()),
        }
    }

    if args.dry {
        ui::success("Dry run: nothing written, post-emission plugins skipped");
    } else {
        let output_dir = pipeline.output_dir();
        for path in &report.written {
            let size = tokio::fs::metadata(path)
                .await
                .map(|m| m.len())
                .unwrap_or_default();
            let name = path.strip_prefix(&output_dir).unwrap_or(path);
            ui::info(&format!("{:<40} {:>10}", name.display(), ui::format_size(size)));
        }
        ui::success(&format!(
            "Processed {} file(s) with {} diagnostic(s)",
            report.written.len(),
            report.diagnostics.len()
        ));
    }
    Ok(())
}

use async_trait::async_trait;
use litpack_config::SizeReportConfig;

use crate::diagnostics::{Diagnostic, report};
use crate::plugin::{EmitContext, Plugin};

/// Logs the size of every written bundle file once the write completes.
#[derive(Debug, Clone, Default)]
pub struct SizeReportPlugin {
    config: SizeReportConfig,
}

impl SizeReportPlugin {
    pub const NAME: &'static str = "size-report";

    pub fn new(config: SizeReportConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Plugin for SizeReportPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn emit_complete(&self, ctx: &EmitContext) -> anyhow::Result<()> {
        let written = ctx.barrier.wait().await?;

        let mut total = 0;
        for path in &written.files {
            let name = written.relative_name(path);
            let size = match tokio::fs::metadata(path).await {
                Ok(meta) => meta.len(),
                Err(e) => {
                    report(
                        &ctx.diagnostics,
                        self.config.verbose,
                        Diagnostic::warning(Self::NAME, format!("could not stat file: {e}"))
                            .with_id(name),
                    );
                    continue;
                }
            };
            total += size;

            if self.config.verbose {
                tracing::info!("{:<40} {:>10}", name, format_size(size));
            }

            if let Some(max) = self.config.max_bytes {
                if size > max {
                    report(
                        &ctx.diagnostics,
                        self.config.verbose,
                        Diagnostic::warning(
                            Self::NAME,
                            format!(
                                "{} exceeds the limit of {}",
                                format_size(size),
                                format_size(max)
                            ),
                        )
                        .with_id(name),
                    );
                }
            }
        }

        if self.config.verbose {
            tracing::info!("{:<40} {:>10}", "total", format_size(total));
        }
        Ok(())
    }
}

/// Format file size in human-readable format (B, KB, MB, GB).
///
/// ```
/// use litpack_bundler::plugins::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1024), "1.00 KB");
/// assert_eq!(format_size(1_048_576), "1.00 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size as u64, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

//! Built-in stages.
//!
//! `replace` acts in `resolve_id` and `clean` in `before_write`. The rest act
//! in `emit_complete`. Copy and HTML injection only need the manifest; the
//! size report waits on the write barrier, and compression also waits for
//! copy and HTML injection to finish.

mod clean;
mod compress;
mod copy;
mod html_template;
mod replace;
mod size_report;

pub use clean::CleanPlugin;
pub use compress::{CompressPlugin, CompressionJob};
pub use copy::CopyPlugin;
pub use html_template::{HtmlTemplatePlugin, Injected, inject_scripts};
pub use replace::ReplacePlugin;
pub use size_report::{SizeReportPlugin, format_size};

use std::path::{Path, PathBuf};

/// Resolve `path` against `root` unless it is already absolute.
fn resolve_from(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() || root.as_os_str().is_empty() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

//! Output writers: the step that puts a bundle on disk.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use super::writer::{validate_and_normalize_dir, validate_output_path, write_bundle_to};
use crate::barrier::WrittenFiles;
use crate::manifest::Bundle;
use crate::{Error, Result};

/// Writes a bundle into `output_dir` and reports the files it wrote.
///
/// The driver publishes the returned list through the write barrier, so an
/// implementation must not return until every file is complete on disk.
#[async_trait]
pub trait OutputWriter: Send + Sync {
    async fn write(
        &self,
        bundle: Arc<Bundle>,
        output_dir: &Path,
        overwrite: bool,
    ) -> Result<WrittenFiles>;

    /// `false` if the bundle is already on disk before [`OutputWriter::write`]
    /// runs. `before_write` hooks are skipped for such writers.
    fn writes_files(&self) -> bool {
        true
    }
}

/// Writes bundle files atomically on the blocking thread pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsOutputWriter;

#[async_trait]
impl OutputWriter for FsOutputWriter {
    async fn write(
        &self,
        bundle: Arc<Bundle>,
        output_dir: &Path,
        overwrite: bool,
    ) -> Result<WrittenFiles> {
        let dir = output_dir.to_path_buf();
        tokio::task::spawn_blocking(move || write_bundle_to(&bundle, &dir, overwrite))
            .await
            .map_err(|e| Error::WriteFailure(format!("write task failed: {e}")))?
    }
}

/// For bundles an external tool has already written: checks that every file
/// named in the manifest exists and reports them without writing anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrewrittenOutput;

#[async_trait]
impl OutputWriter for PrewrittenOutput {
    async fn write(
        &self,
        bundle: Arc<Bundle>,
        output_dir: &Path,
        _overwrite: bool,
    ) -> Result<WrittenFiles> {
        let dir = validate_and_normalize_dir(output_dir)?;
        let mut files = Vec::with_capacity(bundle.manifest.len());
        for file_name in bundle.manifest.file_names() {
            let path = validate_output_path(&dir, file_name)?;
            match tokio::fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => files.push(path),
                Ok(_) => {
                    return Err(Error::WriteFailure(format!(
                        "'{}' is not a file",
                        path.display()
                    )));
                }
                Err(e) => {
                    return Err(Error::WriteFailure(format!(
                        "expected bundle file '{}': {}",
                        path.display(),
                        e
                    )));
                }
            }
        }

        Ok(WrittenFiles {
            output_dir: dir,
            files,
        })
    }

    fn writes_files(&self) -> bool {
        false
    }
}

//! Shared test utilities for litpack-bundler tests

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use litpack_bundler::{Bundle, OutputWriter, Result, WrittenFiles, output::write_bundle_to};

/// Build a bundle of entry chunks from `(file_name, contents)` pairs.
pub fn bundle_of(files: &[(&str, &str)]) -> Bundle {
    let mut bundle = Bundle::default();
    for (file_name, contents) in files {
        let name = file_name.split('.').next().unwrap_or(file_name);
        bundle.push_entry(name, *file_name, *contents);
    }
    bundle
}

/// Writes placeholder contents first, sleeps, then writes the real bundle.
///
/// Anything that reads output before the barrier opens sees the placeholder.
pub struct SlowWriter {
    pub delay: Duration,
}

pub const PARTIAL: &str = "/* partial */";

#[async_trait]
impl OutputWriter for SlowWriter {
    async fn write(
        &self,
        bundle: Arc<Bundle>,
        output_dir: &Path,
        overwrite: bool,
    ) -> Result<WrittenFiles> {
        std::fs::create_dir_all(output_dir)?;
        for file in &bundle.files {
            std::fs::write(output_dir.join(&file.file_name), PARTIAL)?;
        }
        tokio::time::sleep(self.delay).await;
        write_bundle_to(&bundle, output_dir, overwrite)
    }
}

/// Always fails after a short delay.
pub struct FailingWriter;

#[async_trait]
impl OutputWriter for FailingWriter {
    async fn write(&self, _: Arc<Bundle>, _: &Path, _: bool) -> Result<WrittenFiles> {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Err(litpack_bundler::Error::WriteFailure("disk full".to_string()))
    }
}

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use flate2::Compression;
use flate2::write::GzEncoder;
use futures::future::join_all;
use litpack_config::{CompressAlgorithm, CompressConfig};
use walkdir::WalkDir;

use crate::diagnostics::{Diagnostic, report};
use crate::filter::IdFilter;
use crate::output::temp_path_for;
use crate::plugin::{EmitContext, Plugin};
use crate::Result;

const BROTLI_BUFFER_SIZE: usize = 4096;
const BROTLI_WINDOW: u32 = 22;

/// One file to compress with one algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionJob {
    pub source_path: PathBuf,
    pub algorithm: CompressAlgorithm,
}

impl CompressionJob {
    /// `<source>.gz` or `<source>.br`.
    pub fn destination(&self) -> PathBuf {
        let mut name = self.source_path.clone().into_os_string();
        name.push(self.algorithm.extension());
        PathBuf::from(name)
    }
}

/// Writes `.gz`/`.br` siblings for every regular file under the output
/// directory that passes the filter. Runs only after the bundle write and
/// every file-writing stage (copy, HTML injection) have finished.
#[derive(Debug, Clone)]
pub struct CompressPlugin {
    config: CompressConfig,
    filter: IdFilter,
}

impl CompressPlugin {
    pub const NAME: &'static str = "compress";

    pub fn new(config: CompressConfig) -> Result<Self> {
        let filter = IdFilter::new(&config.include, &config.exclude)?;
        Ok(Self { config, filter })
    }

    /// Jobs for `files`, where each file is given as (relative name, absolute path).
    pub fn plan<'a>(&self, files: impl IntoIterator<Item = (String, &'a Path)>) -> Vec<CompressionJob> {
        let mut jobs = Vec::new();
        for (name, path) in files {
            if is_compressed(&name) || !self.filter.matches(&name) {
                continue;
            }
            for &algorithm in &self.config.algorithms {
                jobs.push(CompressionJob {
                    source_path: path.to_path_buf(),
                    algorithm,
                });
            }
        }
        jobs
    }
}

fn is_compressed(name: &str) -> bool {
    name.ends_with(CompressAlgorithm::Gzip.extension())
        || name.ends_with(CompressAlgorithm::Brotli.extension())
}

#[async_trait]
impl Plugin for CompressPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn emit_complete(&self, ctx: &EmitContext) -> anyhow::Result<()> {
        ctx.wait_for_outputs().await?;

        let dir = ctx.output_dir.clone();
        let files = tokio::task::spawn_blocking(move || output_files(&dir)).await??;
        let jobs = self.plan(files.iter().map(|(name, path)| (name.clone(), path.as_path())));

        if jobs.is_empty() {
            tracing::debug!("[compress] nothing to compress");
            return Ok(());
        }

        let gzip_level = self.config.gzip_level;
        let brotli_quality = self.config.brotli_quality;
        let results = join_all(jobs.into_iter().map(|job| async move {
            let task_job = job.clone();
            let outcome = tokio::task::spawn_blocking(move || {
                compress_file(&task_job, gzip_level, brotli_quality)
            })
            .await
            .unwrap_or_else(|e| Err(io::Error::other(e)));
            (job, outcome)
        }))
        .await;

        let mut compressed = 0;
        for (job, outcome) in results {
            match outcome {
                Ok(dest) => {
                    compressed += 1;
                    tracing::trace!("[compress] wrote {}", dest.display());
                }
                Err(e) => report(
                    &ctx.diagnostics,
                    self.config.verbose,
                    Diagnostic::warning(
                        Self::NAME,
                        format!(
                            "could not compress to '{}' with {}: {}",
                            job.destination().display(),
                            job.algorithm.as_str(),
                            e
                        ),
                    )
                    .with_id(job.source_path.display().to_string()),
                ),
            }
        }

        if self.config.verbose {
            tracing::info!("[compress] wrote {compressed} compressed files");
        }
        Ok(())
    }
}

/// Regular files under `dir` as (relative name, absolute path), sorted by name.
fn output_files(dir: &Path) -> io::Result<Vec<(String, PathBuf)>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(dir).map_err(io::Error::other)?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push((name, entry.path().to_path_buf()));
    }
    Ok(files)
}

/// Compress into `<dest>.tmp`, then rename to `<dest>`.
fn compress_file(job: &CompressionJob, gzip_level: u32, brotli_quality: u32) -> io::Result<PathBuf> {
    let input = fs::read(&job.source_path)?;
    let dest = job.destination();
    let temp = temp_path_for(&dest);

    let result = encode_into(&temp, &input, job.algorithm, gzip_level, brotli_quality)
        .and_then(|()| fs::rename(&temp, &dest));

    match result {
        Ok(()) => Ok(dest),
        Err(e) => {
            let _ = fs::remove_file(&temp);
            Err(e)
        }
    }
}

fn encode_into(
    path: &Path,
    input: &[u8],
    algorithm: CompressAlgorithm,
    gzip_level: u32,
    brotli_quality: u32,
) -> io::Result<()> {
    let out = BufWriter::new(File::create(path)?);
    let mut out = match algorithm {
        CompressAlgorithm::Gzip => {
            let mut encoder = GzEncoder::new(out, Compression::new(gzip_level));
            encoder.write_all(input)?;
            encoder.finish()?
        }
        CompressAlgorithm::Brotli => {
            let mut encoder =
                brotli::CompressorWriter::new(out, BROTLI_BUFFER_SIZE, brotli_quality, BROTLI_WINDOW);
            encoder.write_all(input)?;
            encoder.flush()?;
            encoder.into_inner()
        }
    };
    out.flush()
}

//! One-shot "bundle is on disk" signal.
//!
//! Every build creates a [`WriteSignal`]/[`WriteBarrier`] pair. The output
//! writer owns the signal and consumes it exactly once: [`WriteSignal::complete`]
//! after the last file has been renamed into place, or [`WriteSignal::fail`].
//! A signal dropped without either publishes an abort, so waiters can never
//! hang on a writer that panicked or was cancelled.
//!
//! Barriers are cheap to clone and may be awaited any number of times, before
//! or after the outcome is published.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::watch;

use crate::{Error, Result};

/// Files the writer put on disk for this build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrittenFiles {
    pub output_dir: PathBuf,
    /// Absolute paths, in bundle order.
    pub files: Vec<PathBuf>,
}

impl WrittenFiles {
    /// `path` relative to the output directory, with `/` separators.
    pub fn relative_name(&self, path: &std::path::Path) -> String {
        let relative = path.strip_prefix(&self.output_dir).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[derive(Debug, Clone)]
enum BarrierState {
    Pending,
    Written(Arc<WrittenFiles>),
    Failed(Arc<str>),
}

/// Create the signal/barrier pair for one build.
pub fn write_barrier() -> (WriteSignal, WriteBarrier) {
    let (tx, rx) = watch::channel(BarrierState::Pending);
    (WriteSignal { tx: Some(tx) }, WriteBarrier { rx })
}

/// Completing side of the barrier, held by the output writer.
#[derive(Debug)]
pub struct WriteSignal {
    tx: Option<watch::Sender<BarrierState>>,
}

impl WriteSignal {
    pub fn complete(mut self, files: WrittenFiles) {
        if let Some(tx) = self.tx.take() {
            tx.send_replace(BarrierState::Written(Arc::new(files)));
        }
    }

    pub fn fail(mut self, reason: impl Into<String>) {
        if let Some(tx) = self.tx.take() {
            tx.send_replace(BarrierState::Failed(Arc::from(reason.into())));
        }
    }
}

impl Drop for WriteSignal {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            tx.send_replace(BarrierState::Failed(Arc::from(
                "bundle write ended without completing",
            )));
        }
    }
}

/// Waiting side of the barrier.
#[derive(Debug, Clone)]
pub struct WriteBarrier {
    rx: watch::Receiver<BarrierState>,
}

impl WriteBarrier {
    /// Wait until the bundle is written, returning the written files.
    ///
    /// # Errors
    ///
    /// `Error::WriteBarrier` if the write failed or was abandoned.
    pub async fn wait(&self) -> Result<Arc<WrittenFiles>> {
        let mut rx = self.rx.clone();
        let state = rx
            .wait_for(|state| !matches!(state, BarrierState::Pending))
            .await
            .map_err(|_| Error::WriteBarrier("write signal dropped".to_string()))?;

        match &*state {
            BarrierState::Written(files) => Ok(Arc::clone(files)),
            BarrierState::Failed(reason) => Err(Error::WriteBarrier(reason.to_string())),
            BarrierState::Pending => Err(Error::WriteBarrier("write still pending".to_string())),
        }
    }

    /// `true` once an outcome (success or failure) has been published.
    pub fn is_settled(&self) -> bool {
        !matches!(*self.rx.borrow(), BarrierState::Pending)
    }
}

/// Create the tracker for `count` stages that write files besides the bundle.
///
/// Each [`StageGuard`] marks one stage as finished when dropped, whether the
/// stage succeeded, failed or was cancelled.
pub fn output_stages(count: usize) -> (Vec<StageGuard>, StageBarrier) {
    let (tx, rx) = watch::channel(count);
    let tx = Arc::new(tx);
    let guards = (0..count)
        .map(|_| StageGuard {
            tx: Arc::clone(&tx),
        })
        .collect();
    (guards, StageBarrier { rx })
}

/// Held by one file-writing stage for as long as it runs.
#[derive(Debug)]
pub struct StageGuard {
    tx: Arc<watch::Sender<usize>>,
}

impl Drop for StageGuard {
    fn drop(&mut self) {
        self.tx.send_modify(|pending| *pending = pending.saturating_sub(1));
    }
}

/// Resolves once every file-writing stage has finished.
#[derive(Debug, Clone)]
pub struct StageBarrier {
    rx: watch::Receiver<usize>,
}

impl StageBarrier {
    /// A barrier with no stages to wait for.
    pub fn settled() -> Self {
        output_stages(0).1
    }

    pub async fn wait(&self) {
        let mut rx = self.rx.clone();
        // A closed channel means every guard is gone, so nothing is pending.
        let _ = rx.wait_for(|pending| *pending == 0).await;
    }

    pub fn pending(&self) -> usize {
        *self.rx.borrow()
    }
}

//! Transfer orchestration.
//!
//! This module provides:
//! - TransferEngine: drives exactly one transfer attempt per invocation,
//!   enforcing preconditions, tracking in-flight state and normalizing the
//!   backend outcome into a boolean result plus observer callbacks
//! - The public facade functions `move_file` and `copy_file`, which validate
//!   top-level arguments and wire a fresh engine to the filesystem backend

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::backend::TransferBackend;
use crate::error::EngineError;
use crate::fs_ops::FsBackend;
use crate::model::{TransferKind, TransferOutcome};
use crate::progress::{ProgressNotification, ProgressObserver};

/// Coordinator for a single file transfer.
///
/// One engine instance drives at most one transfer at a time; a second call
/// to [`transfer`](TransferEngine::transfer) while one is in progress returns
/// `Ok(false)` without starting anything. Callers needing concurrent
/// transfers use separate engine instances.
pub struct TransferEngine {
    id: Uuid,
    backend: Arc<dyn TransferBackend>,
    source_path: PathBuf,
    destination_path: PathBuf,
    observer: Option<Arc<dyn ProgressObserver>>,
    overwrite_existing: bool,
    in_progress: AtomicBool,
}

/// Clears the in-progress flag on every exit path, including errors and
/// worker panics surfaced through the join handle.
struct InProgressGuard<'a>(&'a AtomicBool);

impl Drop for InProgressGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl TransferEngine {
    /// Create an engine bound to a backend and a source/destination pair.
    ///
    /// A `None` observer is valid and means no progress reporting.
    pub fn new<P: AsRef<Path>>(
        backend: Arc<dyn TransferBackend>,
        source: P,
        destination: P,
        observer: Option<Arc<dyn ProgressObserver>>,
        overwrite_existing: bool,
    ) -> Self {
        TransferEngine {
            id: Uuid::new_v4(),
            backend,
            source_path: source.as_ref().to_path_buf(),
            destination_path: destination.as_ref().to_path_buf(),
            observer,
            overwrite_existing,
            in_progress: AtomicBool::new(false),
        }
    }

    /// True while a transfer started on this engine is still running.
    pub fn is_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::SeqCst)
    }

    /// Run one transfer attempt.
    ///
    /// Returns `Ok(true)` when the backend completes the transfer, and
    /// `Ok(false)` when the observer cancelled it or another transfer was
    /// already in progress on this engine.
    ///
    /// # Errors
    /// - `SourceNotFound` if the source path is not an existing file
    /// - `DestinationExists` if the destination exists and overwriting is
    ///   disabled
    /// - `OsFailure` for backend failures not caused by cancellation
    pub async fn transfer(&self, kind: TransferKind) -> Result<bool, EngineError> {
        let total_bytes = match fs::metadata(&self.source_path) {
            Ok(metadata) if metadata.is_file() => metadata.len(),
            _ => {
                return Err(EngineError::SourceNotFound {
                    path: self.source_path.clone(),
                });
            }
        };

        if !self.overwrite_existing && self.destination_path.exists() {
            return Err(EngineError::DestinationExists {
                path: self.destination_path.clone(),
            });
        }

        // Benign no-op rejection, not an error: one transfer per engine
        if self.in_progress.swap(true, Ordering::SeqCst) {
            debug!(id = %self.id, "transfer rejected: already in progress");
            return Ok(false);
        }
        let _guard = InProgressGuard(&self.in_progress);

        debug!(
            id = %self.id,
            %kind,
            source = %self.source_path.display(),
            destination = %self.destination_path.display(),
            total_bytes,
            "starting transfer"
        );

        let backend = Arc::clone(&self.backend);
        let observer = self.observer.clone();
        let source = self.source_path.clone();
        let destination = self.destination_path.clone();

        let worker = tokio::task::spawn_blocking(move || {
            let mut reported_final = false;
            let outcome = backend.transfer(&source, &destination, kind, &mut |update| {
                if let Some(observer) = observer.as_deref() {
                    observer.on_progress(update);
                }
                if update.is_complete() {
                    reported_final = true;
                }
            });
            (outcome, reported_final)
        });

        let (outcome, reported_final) = worker.await.map_err(|e| EngineError::Unknown {
            message: format!("transfer worker failed: {}", e),
        })?;

        match outcome? {
            TransferOutcome::Cancelled => {
                debug!(id = %self.id, "transfer cancelled by observer");
                Ok(false)
            }
            TransferOutcome::Completed => {
                // Small transfers can complete without the backend ever
                // reporting 100%; make sure the observer still sees it
                if !reported_final {
                    let mut terminal = ProgressNotification::new(total_bytes, total_bytes);
                    if let Some(observer) = self.observer.as_deref() {
                        observer.on_progress(&mut terminal);
                    }
                }
                debug!(id = %self.id, "transfer completed");
                Ok(true)
            }
        }
    }
}

fn validate_path_arg(path: &Path, name: &str) -> Result<(), EngineError> {
    if path.as_os_str().to_string_lossy().trim().is_empty() {
        return Err(EngineError::InvalidArgument {
            reason: format!("{} path is empty or blank", name),
        });
    }
    Ok(())
}

async fn transfer_file(
    source: &Path,
    destination: &Path,
    kind: TransferKind,
    observer: Option<Arc<dyn ProgressObserver>>,
    overwrite_existing: bool,
) -> Result<bool, EngineError> {
    validate_path_arg(source, "source")?;
    validate_path_arg(destination, "destination")?;

    let engine = TransferEngine::new(
        Arc::new(FsBackend::new()),
        source,
        destination,
        observer,
        overwrite_existing,
    );
    engine.transfer(kind).await
}

/// Move a single file, reporting progress to an optional observer.
///
/// Returns `Ok(true)` when the file was moved and `Ok(false)` when the
/// observer cancelled the transfer. After a `true` result the source path no
/// longer exists and the destination holds the file's bytes.
pub async fn move_file<P: AsRef<Path>>(
    source: P,
    destination: P,
    observer: Option<Arc<dyn ProgressObserver>>,
    overwrite_existing: bool,
) -> Result<bool, EngineError> {
    transfer_file(
        source.as_ref(),
        destination.as_ref(),
        TransferKind::Move,
        observer,
        overwrite_existing,
    )
    .await
}

/// Copy a single file, reporting progress to an optional observer.
///
/// Returns `Ok(true)` when the file was copied and `Ok(false)` when the
/// observer cancelled the transfer. After a `true` result both paths hold
/// the file's bytes.
pub async fn copy_file<P: AsRef<Path>>(
    source: P,
    destination: P,
    observer: Option<Arc<dyn ProgressObserver>>,
    overwrite_existing: bool,
) -> Result<bool, EngineError> {
    transfer_file(
        source.as_ref(),
        destination.as_ref(),
        TransferKind::Copy,
        observer,
        overwrite_existing,
    )
    .await
}

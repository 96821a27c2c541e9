//! Filesystem transfer backend.
//!
//! This module provides `FsBackend`, the concrete `TransferBackend` built on
//! portable std filesystem primitives:
//! - Chunked copy loop with a progress notification per chunk
//! - Cancellation check immediately after every notification
//! - Rename fast path for same-filesystem moves
//! - Modification time preservation on copy

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use crate::backend::TransferBackend;
use crate::error::EngineError;
use crate::model::{TransferKind, TransferOutcome};
use crate::progress::ProgressNotification;

/// Bytes copied between progress notifications.
const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// `TransferBackend` implementation using the OS filesystem.
///
/// Copies run through a fixed-size buffer, emitting one notification before
/// the first chunk and one after each chunk. Moves try `fs::rename` first and
/// fall back to copy-then-delete when the rename fails (cross-device moves).
///
/// On cancellation or a mid-copy I/O failure the partial destination file is
/// removed, so a non-success outcome never leaves a destination that looks
/// complete.
pub struct FsBackend {
    chunk_size: usize,
}

impl FsBackend {
    pub fn new() -> Self {
        FsBackend {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Use a non-default chunk size (smaller chunks mean more frequent
    /// progress notifications and cancellation checks).
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        FsBackend { chunk_size }
    }

    /// Copy `source` to `destination` chunk by chunk.
    fn copy_chunked(
        &self,
        source: &Path,
        destination: &Path,
        on_progress: &mut dyn FnMut(&mut ProgressNotification),
    ) -> Result<TransferOutcome, EngineError> {
        let mut src_file = fs::File::open(source).map_err(|e| EngineError::OsFailure {
            path: source.to_path_buf(),
            source: e,
        })?;

        let src_metadata = src_file.metadata().map_err(|e| EngineError::OsFailure {
            path: source.to_path_buf(),
            source: e,
        })?;
        let total_bytes = src_metadata.len();
        let src_mtime = src_metadata.modified().ok();

        ensure_parent_dir_exists(destination)?;

        let mut dst_file = fs::File::create(destination).map_err(|e| EngineError::OsFailure {
            path: destination.to_path_buf(),
            source: e,
        })?;

        // Initial notification lets the observer cancel before any bytes move
        let mut update = ProgressNotification::new(total_bytes, 0);
        on_progress(&mut update);
        if update.cancelled {
            drop(dst_file);
            let _ = fs::remove_file(destination);
            return Ok(TransferOutcome::Cancelled);
        }

        let mut buf = vec![0u8; self.chunk_size];
        let mut transferred: u64 = 0;

        loop {
            let n = match src_file.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    drop(dst_file);
                    let _ = fs::remove_file(destination);
                    return Err(EngineError::OsFailure {
                        path: source.to_path_buf(),
                        source: e,
                    });
                }
            };

            if let Err(e) = dst_file.write_all(&buf[..n]) {
                drop(dst_file);
                let _ = fs::remove_file(destination);
                return Err(EngineError::OsFailure {
                    path: destination.to_path_buf(),
                    source: e,
                });
            }

            transferred += n as u64;
            let mut update = ProgressNotification::new(total_bytes, transferred);
            on_progress(&mut update);
            if update.cancelled {
                drop(dst_file);
                let _ = fs::remove_file(destination);
                return Ok(TransferOutcome::Cancelled);
            }
        }

        // Preserve modification time if available
        if let Some(mtime) = src_mtime {
            let _ = filetime::set_file_mtime(
                destination,
                filetime::FileTime::from_system_time(mtime),
            );
        }

        Ok(TransferOutcome::Completed)
    }
}

impl Default for FsBackend {
    fn default() -> Self {
        FsBackend::new()
    }
}

impl TransferBackend for FsBackend {
    fn transfer(
        &self,
        source: &Path,
        destination: &Path,
        kind: TransferKind,
        on_progress: &mut dyn FnMut(&mut ProgressNotification),
    ) -> Result<TransferOutcome, EngineError> {
        match kind {
            TransferKind::Copy => self.copy_chunked(source, destination, on_progress),
            TransferKind::Move => {
                if fs::rename(source, destination).is_ok() {
                    // Same-filesystem rename completes in one step; report a
                    // single terminal notification
                    let total_bytes = fs::metadata(destination)
                        .map(|m| m.len())
                        .map_err(|e| EngineError::OsFailure {
                            path: destination.to_path_buf(),
                            source: e,
                        })?;
                    let mut update = ProgressNotification::new(total_bytes, total_bytes);
                    on_progress(&mut update);
                    return Ok(TransferOutcome::Completed);
                }

                // Rename failed (likely a cross-device move); copy then delete
                match self.copy_chunked(source, destination, on_progress)? {
                    TransferOutcome::Cancelled => Ok(TransferOutcome::Cancelled),
                    TransferOutcome::Completed => {
                        fs::remove_file(source).map_err(|e| EngineError::OsFailure {
                            path: source.to_path_buf(),
                            source: e,
                        })?;
                        Ok(TransferOutcome::Completed)
                    }
                }
            }
        }
    }
}

/// Ensure the parent directory of a path exists, creating it if necessary.
pub fn ensure_parent_dir_exists(path: &Path) -> Result<(), EngineError> {
    if let Some(parent) = path.parent() {
        if parent.as_os_str().is_empty() {
            return Ok(());
        }
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| EngineError::OsFailure {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(path: &Path, contents: &[u8]) {
        let mut file = fs::File::create(path).expect("Failed to create file");
        file.write_all(contents).expect("Failed to write file");
    }

    #[test]
    fn test_copy_reports_increasing_progress() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("source.bin");
        let dst = temp_dir.path().join("dest.bin");
        write_file(&src, &[7u8; 10]);

        let backend = FsBackend::with_chunk_size(4);
        let mut seen = Vec::new();
        let outcome = backend
            .transfer(&src, &dst, TransferKind::Copy, &mut |update| {
                seen.push((update.total_bytes, update.transferred_bytes));
            })
            .expect("Copy should succeed");

        assert_eq!(outcome, TransferOutcome::Completed);
        assert_eq!(seen, vec![(10, 0), (10, 4), (10, 8), (10, 10)]);
        assert_eq!(fs::read(&dst).expect("Failed to read dest"), vec![7u8; 10]);
        assert!(src.exists(), "Copy must leave the source intact");
    }

    #[test]
    fn test_copy_zero_byte_file_reports_terminal_notification() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("empty.bin");
        let dst = temp_dir.path().join("dest.bin");
        write_file(&src, b"");

        let backend = FsBackend::new();
        let mut seen = Vec::new();
        let outcome = backend
            .transfer(&src, &dst, TransferKind::Copy, &mut |update| {
                seen.push((update.total_bytes, update.transferred_bytes));
            })
            .expect("Copy should succeed");

        assert_eq!(outcome, TransferOutcome::Completed);
        assert_eq!(seen, vec![(0, 0)]);
        assert!(dst.exists());
    }

    #[test]
    fn test_cancel_mid_copy_removes_partial_destination() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("source.bin");
        let dst = temp_dir.path().join("dest.bin");
        write_file(&src, &[1u8; 12]);

        let backend = FsBackend::with_chunk_size(4);
        let outcome = backend
            .transfer(&src, &dst, TransferKind::Copy, &mut |update| {
                if update.transferred_bytes >= 4 {
                    update.cancelled = true;
                }
            })
            .expect("Cancellation is not an error");

        assert_eq!(outcome, TransferOutcome::Cancelled);
        assert!(!dst.exists(), "Partial destination should be removed");
        assert!(src.exists(), "Source must survive a cancelled copy");
    }

    #[test]
    fn test_move_renames_and_reports_terminal_notification() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("source.bin");
        let dst = temp_dir.path().join("dest.bin");
        write_file(&src, b"move me please now");

        let backend = FsBackend::new();
        let mut seen = Vec::new();
        let outcome = backend
            .transfer(&src, &dst, TransferKind::Move, &mut |update| {
                seen.push((update.total_bytes, update.transferred_bytes));
            })
            .expect("Move should succeed");

        assert_eq!(outcome, TransferOutcome::Completed);
        assert_eq!(seen, vec![(18, 18)]);
        assert!(!src.exists(), "Move must remove the source");
        assert_eq!(
            fs::read(&dst).expect("Failed to read dest"),
            b"move me please now"
        );
    }

    #[test]
    fn test_copy_fails_for_missing_source() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("nonexistent.bin");
        let dst = temp_dir.path().join("dest.bin");

        let backend = FsBackend::new();
        let result = backend.transfer(&src, &dst, TransferKind::Copy, &mut |_| {});
        assert!(matches!(result, Err(EngineError::OsFailure { .. })));
    }

    #[test]
    fn test_copy_creates_missing_parent_directories() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("source.bin");
        let dst = temp_dir.path().join("nested").join("deeper").join("dest.bin");
        write_file(&src, b"data");

        let backend = FsBackend::new();
        let outcome = backend
            .transfer(&src, &dst, TransferKind::Copy, &mut |_| {})
            .expect("Copy should succeed");

        assert_eq!(outcome, TransferOutcome::Completed);
        assert_eq!(fs::read(&dst).expect("Failed to read dest"), b"data");
    }
}

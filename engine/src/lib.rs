//! # fmove Engine - Single-file transfer library
//!
//! A small engine for moving or copying one file off the caller's thread
//! while reporting byte-level progress and honoring mid-transfer
//! cancellation.
//!
//! ## Overview
//!
//! The engine validates preconditions (source existence, destination
//! overwrite policy), runs the transfer as a background unit of work, and
//! forwards every backend progress notification to a caller-supplied
//! observer. The observer can abort the transfer by setting the `cancelled`
//! flag on a notification during the callback; cancellation surfaces as a
//! `false` result, never as an error.
//!
//! The byte-moving mechanism is abstracted behind the `TransferBackend`
//! trait, so the engine is testable with a substitute backend and portable
//! across operating systems.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use engine::{copy_file, move_file};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), engine::EngineError> {
//! // Copy with no progress reporting, overwriting an existing destination
//! let completed = copy_file("data.bin", "backup/data.bin", None, true).await?;
//! assert!(completed);
//!
//! // Move; a false result means the observer cancelled the transfer
//! let completed = move_file("data.bin", "archive/data.bin", None, true).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - **model**: Transfer kind and outcome enums
//! - **progress**: Progress notification record and observer trait
//! - **error**: Error types and handling
//! - **backend**: The transfer backend trait
//! - **fs_ops**: Filesystem backend (chunked copy, rename fast path)
//! - **transfer**: The transfer engine and the `move_file`/`copy_file` facade
//! - **checksums**: Post-transfer content verification

pub mod backend;
pub mod checksums;
pub mod error;
pub mod fs_ops;
pub mod model;
pub mod progress;
pub mod transfer;

// Re-export main types and functions
pub use backend::TransferBackend;
pub use checksums::{compute_file_checksum, files_match, ChecksumAlgorithm, ChecksumValue};
pub use error::EngineError;
pub use fs_ops::FsBackend;
pub use model::{TransferKind, TransferOutcome};
pub use progress::{ProgressNotification, ProgressObserver};
pub use transfer::{copy_file, move_file, TransferEngine};

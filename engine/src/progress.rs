//! Progress reporting types.
//!
//! This module defines the ProgressNotification record exchanged between the
//! backend and the caller's observer, and the ProgressObserver trait, which
//! decouples the transfer engine from any specific UI technology (CLI, GUI,
//! etc.).
//!
//! Cancellation travels the same channel: the observer sets `cancelled` on
//! the notification during the callback, and the backend checks the flag
//! immediately after each invocation.

use serde::Serialize;

/// A single progress tick for an in-flight transfer.
///
/// One notification is created per callback invocation and never reused.
/// The observer owns it for the duration of the synchronous callback and may
/// set `cancelled` to request that the transfer be aborted.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressNotification {
    /// Total size of the file being transferred, in bytes
    pub total_bytes: u64,

    /// Bytes transferred so far (0 <= transferred_bytes <= total_bytes)
    pub transferred_bytes: u64,

    /// Set by the observer to request cancellation of the transfer
    pub cancelled: bool,
}

impl ProgressNotification {
    /// Create a notification with the cancellation flag cleared.
    pub fn new(total_bytes: u64, transferred_bytes: u64) -> Self {
        ProgressNotification {
            total_bytes,
            transferred_bytes,
            cancelled: false,
        }
    }

    /// Returns true if this notification reports the full file transferred.
    pub fn is_complete(&self) -> bool {
        self.transferred_bytes == self.total_bytes
    }
}

/// Trait for receiving progress updates from a transfer.
///
/// Implement this trait to receive a callback per backend progress tick.
/// The CLI provides a stderr implementation; other UIs can implement it too.
///
/// Callbacks are invoked synchronously on whatever thread the backend runs
/// on; setting `cancelled` on the notification is the only way to abort an
/// in-flight transfer.
pub trait ProgressObserver: Send + Sync {
    /// Called once per progress notification, plus once more for the
    /// terminal notification the engine synthesizes for tiny transfers.
    fn on_progress(&self, update: &mut ProgressNotification);
}

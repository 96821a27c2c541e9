//! Transfer backend trait.
//!
//! The engine depends on the byte-moving mechanism only through this narrow
//! capability interface, so the engine stays fully testable with a substitute
//! backend and portable across operating systems.

use std::path::Path;

use crate::error::EngineError;
use crate::model::{TransferKind, TransferOutcome};
use crate::progress::ProgressNotification;

/// The byte-moving mechanism consumed by the transfer engine.
///
/// Implementations must invoke `on_progress` at least once per chunk of
/// completed work (granularity is implementation-defined) and check the
/// notification's `cancelled` flag immediately after each invocation. When
/// the flag is set, the transfer must be aborted as soon as safely possible
/// and reported as `TransferOutcome::Cancelled`, never as an error.
///
/// Progress notifications for a single transfer must be delivered in
/// strictly increasing `transferred_bytes` order.
pub trait TransferBackend: Send + Sync {
    /// Transfer `source` to `destination`, driving progress through
    /// `on_progress`.
    ///
    /// # Errors
    /// Returns `EngineError::OsFailure` for failures not attributable to
    /// observer-driven cancellation.
    fn transfer(
        &self,
        source: &Path,
        destination: &Path,
        kind: TransferKind,
        on_progress: &mut dyn FnMut(&mut ProgressNotification),
    ) -> Result<TransferOutcome, EngineError>;
}

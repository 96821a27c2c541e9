//! Core data model for file transfers.
//!
//! This module defines the enums shared between the engine and its backend:
//! - TransferKind: whether the operation is a Move or a Copy
//! - TransferOutcome: how a backend run ended (completed or cancelled)

use serde::Serialize;

/// The kind of operation performed on the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransferKind {
    /// Move the file; the source is gone after a successful transfer
    Move,
    /// Copy the file; the source remains unchanged
    Copy,
}

impl std::fmt::Display for TransferKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferKind::Move => write!(f, "Move"),
            TransferKind::Copy => write!(f, "Copy"),
        }
    }
}

/// The non-error outcomes of a backend transfer run.
///
/// Cancellation is a normal, expected outcome and therefore not an error;
/// unexpected I/O failures are reported through `EngineError` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// The backend transferred every byte to the destination
    Completed,
    /// The observer requested cancellation and the backend aborted
    Cancelled,
}

impl std::fmt::Display for TransferOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferOutcome::Completed => write!(f, "Completed"),
            TransferOutcome::Cancelled => write!(f, "Cancelled"),
        }
    }
}

//! Host-integration surface consumed by the bridge core.
//!
//! The document, its undo machinery, and the component model belong to the
//! host application; the bridge only depends on the narrow contract defined
//! here. Mutation is confined to one designated thread via
//! [`MutationThread`].

mod mutation;
#[cfg(any(test, feature = "test-support"))]
mod stub;

use serde::Serialize;
use thiserror::Error;

pub use mutation::{MutationError, MutationThread};
#[cfg(any(test, feature = "test-support"))]
pub use stub::StubHostDocument;

/// Opaque token identifying an open undo record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoRecordId(pub u32);

/// Description of a component the host should add to the document.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentSpec {
    /// Host component kind, e.g. `GH_NumberSlider`.
    pub kind: String,
    /// Display name shown on the canvas.
    pub nickname: String,
    /// Optional initialisation expression understood by the component.
    pub init_code: Option<String>,
    /// Canvas pivot position.
    pub pivot: (f64, f64),
}

/// Component details reported back to the agent after placement.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComponentInfo {
    /// Host-assigned instance identifier.
    pub id: String,
    /// Component kind.
    #[serde(rename = "type")]
    pub kind: String,
    /// Display name of the placed component.
    pub name: String,
    /// Canvas pivot x coordinate.
    pub x: f64,
    /// Canvas pivot y coordinate.
    pub y: f64,
}

/// Failure reported by the host while mutating the document.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HostError {
    pub message: String,
}

impl HostError {
    /// Builds a host error from a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Mutable document surface the host exposes to command handlers.
///
/// Implementations are only ever called from the mutation thread, so they may
/// use single-threaded interior mutability freely; the trait takes `&self`
/// to allow the undo scope and the handler to share the document borrow.
pub trait HostDocument: Send {
    /// Opens an undo record grouping subsequent edits into one undoable unit.
    fn begin_undo_record(&self, label: &str) -> UndoRecordId;
    /// Closes a previously opened undo record.
    fn end_undo_record(&self, record: UndoRecordId);
    /// Adds a component to the document and reports its placement.
    ///
    /// # Errors
    ///
    /// Returns a [`HostError`] when the host rejects the component.
    fn add_component(&self, spec: ComponentSpec) -> Result<ComponentInfo, HostError>;
    /// Schedules a document recompute after edits.
    fn recompute(&self);
}

/// Scoped undo transaction: the record closes when the scope drops, on the
/// success path, the handler-error path, and during unwind alike.
pub struct UndoScope<'a> {
    document: &'a dyn HostDocument,
    record: UndoRecordId,
}

impl<'a> UndoScope<'a> {
    /// Opens an undo record on the given document.
    #[must_use]
    pub fn begin(document: &'a dyn HostDocument, label: &str) -> Self {
        let record = document.begin_undo_record(label);
        Self { document, record }
    }
}

impl Drop for UndoScope<'_> {
    fn drop(&mut self) {
        self.document.end_undo_record(self.record);
    }
}

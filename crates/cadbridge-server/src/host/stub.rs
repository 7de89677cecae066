//! In-memory host document used by tests and workspace integration suites.

use std::sync::Mutex;

use uuid::Uuid;

use super::{ComponentInfo, ComponentSpec, HostDocument, HostError, UndoRecordId};

#[derive(Debug, Default)]
struct StubState {
    components: Vec<ComponentInfo>,
    undo_begun: u32,
    undo_ended: u32,
    recomputes: u32,
    reject_components: bool,
}

/// Host document double that assigns fresh ids and counts undo activity.
#[derive(Debug, Default)]
pub struct StubHostDocument {
    state: Mutex<StubState>,
}

impl StubHostDocument {
    /// Makes every subsequent `add_component` call fail.
    pub fn reject_components(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.reject_components = true;
        }
    }

    /// Number of undo records begun so far.
    pub fn undo_records_begun(&self) -> u32 {
        self.state.lock().map(|state| state.undo_begun).unwrap_or(0)
    }

    /// Number of undo records begun but not yet ended.
    pub fn open_undo_records(&self) -> u32 {
        self.state
            .lock()
            .map(|state| state.undo_begun - state.undo_ended)
            .unwrap_or(0)
    }

    /// Number of recompute requests observed.
    pub fn recomputes(&self) -> u32 {
        self.state.lock().map(|state| state.recomputes).unwrap_or(0)
    }

    /// Components added so far.
    pub fn components(&self) -> Vec<ComponentInfo> {
        self.state
            .lock()
            .map(|state| state.components.clone())
            .unwrap_or_default()
    }
}

impl HostDocument for StubHostDocument {
    fn begin_undo_record(&self, _label: &str) -> UndoRecordId {
        let mut state = self.state.lock().unwrap_or_else(|poison| poison.into_inner());
        state.undo_begun += 1;
        UndoRecordId(state.undo_begun)
    }

    fn end_undo_record(&self, _record: UndoRecordId) {
        let mut state = self.state.lock().unwrap_or_else(|poison| poison.into_inner());
        state.undo_ended += 1;
    }

    fn add_component(&self, spec: ComponentSpec) -> Result<ComponentInfo, HostError> {
        let mut state = self.state.lock().unwrap_or_else(|poison| poison.into_inner());
        if state.reject_components {
            return Err(HostError::new("document rejected the component"));
        }
        let info = ComponentInfo {
            id: Uuid::new_v4().to_string(),
            kind: spec.kind,
            name: spec.nickname,
            x: spec.pivot.0,
            y: spec.pivot.1,
        };
        state.components.push(info.clone());
        Ok(info)
    }

    fn recompute(&self) {
        let mut state = self.state.lock().unwrap_or_else(|poison| poison.into_inner());
        state.recomputes += 1;
    }
}

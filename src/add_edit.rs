use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default delay between two status polls of a watched cluster.
pub const ADD_EDIT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default deadline for a watch to resolve before it reports a timeout.
pub const ADD_EDIT_WATCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddEditState {
    None,
    Watching,
    Ready,
    Warning,
    Error,
    TimedOut,
    Critical,
}

impl AddEditState {
    pub fn metric_label(&self) -> String {
        format!("{self:?}").to_lowercase()
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddEditMode {
    Add,
    Edit,
}

/// Immutable status value held by the store layer. Transitions produce a new
/// value, the holder replaces it wholesale.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddEditStatus {
    pub state: AddEditState,
    pub mode: AddEditMode,
}

impl AddEditStatus {
    pub fn new(state: AddEditState, mode: AddEditMode) -> Self {
        Self { state, mode }
    }

    pub fn watching() -> Self {
        Self::new(AddEditState::Watching, AddEditMode::Edit)
    }

    pub fn timed_out() -> Self {
        Self::new(AddEditState::TimedOut, AddEditMode::Edit)
    }
}

impl Default for AddEditStatus {
    fn default() -> Self {
        Self::new(AddEditState::None, AddEditMode::Add)
    }
}

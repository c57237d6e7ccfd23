//! Stage progression state.

use serde::{Deserialize, Serialize};
use witnesslab_content::domain::stages::StageId;

/// Whether the current stage's checkpoint has been reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    #[default]
    InProgress,
    Completed,
}

/// Position within the ordered stage list plus overlay visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageRunState {
    pub current_stage_id: StageId,
    pub stage_status: StageStatus,
    pub is_transition_open: bool,
    pub is_context_open: bool,
}

impl StageRunState {
    /// The record kept in device-local storage.
    #[must_use]
    pub fn to_persisted(&self) -> PersistedStageState {
        PersistedStageState {
            current_stage_id: self.current_stage_id,
            stage_status: self.stage_status,
        }
    }
}

/// Stage position as stored on the device. Overlay flags are not kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedStageState {
    pub current_stage_id: StageId,
    pub stage_status: StageStatus,
}

use percept_core::SessionId;

use crate::trial::TrialSnapshot;

/// Lifecycle phase of a survey controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyStatus {
    /// Image list not loaded yet (or the load failed).
    Uninitialized,
    Idle,
    InProgress,
    OnBreak,
    Completed,
}

/// Broadcast by the controller on every state transition, in the exact
/// order the transitions occur.
#[derive(Debug, Clone, PartialEq)]
pub enum SurveyEvent {
    Started,
    /// The current trial changed visibility (armed hidden, or revealed).
    TrialUpdated(TrialSnapshot),
    /// A rest break starts before trial `current` of `total`.
    Break { current: usize, total: usize },
    Completed,
    Reset { session_id: SessionId },
}

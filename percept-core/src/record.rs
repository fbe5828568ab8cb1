use serde::{Deserialize, Serialize};

use crate::session::SessionId;

/// Recorded outcome for one trial, handed to the result sink.
///
/// The serialized field names match the survey's REST table layout
/// (`UserID`, `TestName`, ...) so the HTTP sink can post records as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(rename = "UserID")]
    pub session_id: SessionId,
    #[serde(rename = "TestName")]
    pub test_name: String,
    #[serde(rename = "TestNumber")]
    pub test_index: usize,
    /// Reaction time in milliseconds; absent when the trial was skipped.
    #[serde(rename = "Duration", skip_serializing_if = "Option::is_none", default)]
    pub duration_ms: Option<u64>,
    /// The randomized pre-reveal delay that was in effect.
    #[serde(rename = "Delay")]
    pub delay_ms: u64,
    #[serde(rename = "Acknowledged")]
    pub acknowledged: bool,
}

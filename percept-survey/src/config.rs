use percept_core::SurveyMode;

use crate::order::OrderingPolicy;

/// How long a revealed image stays on screen before the controller gives
/// up on the participant and records an implicit skip.
pub const SKIP_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone)]
pub struct SurveyConfig {
    /// Filter applied to build the active trial list on start.
    pub mode: SurveyMode,
    /// Trials between forced rest breaks. Must be at least 1.
    pub break_cadence: usize,
    /// Inclusive bounds for the randomized pre-reveal delay.
    pub reveal_delay_range_ms: (u64, u64),
    pub skip_timeout_ms: u64,
    pub ordering: OrderingPolicy,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            mode: SurveyMode::Both,
            break_cadence: 25,
            reveal_delay_range_ms: (1000, 6000),
            skip_timeout_ms: SKIP_TIMEOUT_MS,
            ordering: OrderingPolicy::GroupedByMode,
        }
    }
}

use thiserror::Error;

use crate::listen::BroadcastError;

#[derive(Debug, Error)]
pub enum SurveyError {
    /// The image list has not been loaded; only `reset` and the setters
    /// work until `initialize` succeeds.
    #[error("survey controller is not initialized")]
    NotInitialized,

    #[error("failed to load the image list")]
    Source(#[source] anyhow::Error),

    #[error("break cadence must be at least 1, got {0}")]
    InvalidCadence(usize),

    #[error(transparent)]
    Listeners(#[from] BroadcastError),
}

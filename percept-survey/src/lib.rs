pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod listen;
pub mod order;
pub mod trial;

pub use config::{SurveyConfig, SKIP_TIMEOUT_MS};
pub use controller::SurveyController;
pub use error::SurveyError;
pub use event::{SurveyEvent, SurveyStatus};
pub use listen::{BroadcastError, Listenable, ListenerFailure, ListenerId, ListenerResult};
pub use order::OrderingPolicy;
pub use trial::TrialSnapshot;

pub mod image;
pub mod provider;
pub mod record;
pub mod session;

pub use image::{DisplayMode, ImageDescriptor, SurveyMode};
pub use provider::{ImageSource, ResultSink};
pub use record::ResultRecord;
pub use session::SessionId;

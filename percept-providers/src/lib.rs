pub mod config;
pub mod manifest;
pub mod remote;
pub mod results;

pub use config::{image_source, result_sink, ProviderConfig};
pub use manifest::ManifestImageSource;
pub use remote::RemoteImageSource;
pub use results::{HttpResultSink, JsonlResultSink, DEFAULT_RESULT_ENDPOINT};

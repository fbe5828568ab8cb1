use std::env;
use std::path::PathBuf;

use percept_core::{ImageSource, ResultSink};

use crate::manifest::ManifestImageSource;
use crate::remote::RemoteImageSource;
use crate::results::{HttpResultSink, JsonlResultSink};

/// Provider selection. Read from `PERCEPT_*` environment variables the
/// way the original web build read its deployment settings; URLs switch
/// a collaborator to its remote implementation, otherwise local files
/// are used.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Local JSON manifest of image source paths.
    pub manifest_path: PathBuf,
    /// When set, images are listed from this endpoint instead.
    pub listing_url: Option<String>,
    /// Local JSON-lines results file.
    pub results_path: PathBuf,
    /// When set, results are POSTed here instead.
    pub results_url: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from("image-list.json"),
            listing_url: None,
            results_path: PathBuf::from("survey-results.jsonl"),
            results_url: None,
        }
    }
}

impl ProviderConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            manifest_path: env::var_os("PERCEPT_IMAGE_MANIFEST")
                .map(PathBuf::from)
                .unwrap_or(defaults.manifest_path),
            listing_url: env::var("PERCEPT_IMAGE_LISTING_URL").ok(),
            results_path: env::var_os("PERCEPT_RESULTS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.results_path),
            results_url: env::var("PERCEPT_RESULTS_URL").ok(),
        }
    }
}

pub fn image_source(config: &ProviderConfig) -> Box<dyn ImageSource> {
    match &config.listing_url {
        Some(url) => Box::new(RemoteImageSource::new(url.clone())),
        None => Box::new(ManifestImageSource::new(config.manifest_path.clone())),
    }
}

pub fn result_sink(config: &ProviderConfig) -> anyhow::Result<Box<dyn ResultSink>> {
    Ok(match &config.results_url {
        Some(url) => Box::new(HttpResultSink::new(url.clone())?),
        None => Box::new(JsonlResultSink::create(config.results_path.clone())?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_files() {
        let config = ProviderConfig::default();
        assert_eq!(config.manifest_path, PathBuf::from("image-list.json"));
        assert!(config.listing_url.is_none());
        assert!(config.results_url.is_none());
    }
}

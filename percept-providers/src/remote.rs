use anyhow::Context;
use percept_core::{ImageDescriptor, ImageSource};
use reqwest::blocking::Client;

use crate::manifest::descriptors_from_sources;

/// Fetches the image listing from an HTTP endpoint serving the same JSON
/// array the local manifest holds. Stands in for an object-storage
/// listing; the controller only ever sees the `ImageSource` contract.
pub struct RemoteImageSource {
    url: String,
    client: Client,
}

impl RemoteImageSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: Client::new(),
        }
    }
}

impl ImageSource for RemoteImageSource {
    fn image_list(&mut self) -> anyhow::Result<Vec<ImageDescriptor>> {
        let sources: Vec<String> = self
            .client
            .get(&self.url)
            .send()
            .with_context(|| format!("requesting image listing from {}", self.url))?
            .error_for_status()
            .context("image listing request rejected")?
            .json()
            .context("decoding image listing")?;
        Ok(descriptors_from_sources(sources))
    }
}

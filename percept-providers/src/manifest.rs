use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context;
use percept_core::{DisplayMode, ImageDescriptor, ImageSource};

/// Image source backed by a local manifest: a JSON array of source paths
/// as written by the `prep-images` tool.
pub struct ManifestImageSource {
    path: PathBuf,
}

impl ManifestImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ImageSource for ManifestImageSource {
    fn image_list(&mut self) -> anyhow::Result<Vec<ImageDescriptor>> {
        let file = File::open(&self.path)
            .with_context(|| format!("opening image manifest {}", self.path.display()))?;
        let sources: Vec<String> =
            serde_json::from_reader(BufReader::new(file)).context("parsing image manifest")?;
        Ok(descriptors_from_sources(sources))
    }
}

pub fn descriptors_from_sources(sources: Vec<String>) -> Vec<ImageDescriptor> {
    sources.into_iter().map(descriptor_from_source).collect()
}

/// The name is the source path with the `/images/` prefix stripped; the
/// mode is dark iff the path mentions "dark". This mirrors how the image
/// sets are curated (every dark-mode mockup carries "dark" in its name).
fn descriptor_from_source(source: String) -> ImageDescriptor {
    let name = source
        .strip_prefix("/images/")
        .unwrap_or(&source)
        .to_string();
    let mode = if source.contains("dark") {
        DisplayMode::Dark
    } else {
        DisplayMode::Light
    };
    ImageDescriptor { source, name, mode }
}

//! Builds the image manifest consumed by `ManifestImageSource`: scans a
//! directory tree for SVG mockups and writes a JSON array of
//! `/images/<relative-path>` entries.
//!
//! Usage: `prep-images [images-dir] [output-file]`
//! Defaults: `public/images` and `image-list.json`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let images_dir = PathBuf::from(args.next().unwrap_or_else(|| "public/images".to_string()));
    let output = PathBuf::from(args.next().unwrap_or_else(|| "image-list.json".to_string()));

    if !images_dir.is_dir() {
        anyhow::bail!("image directory not found: {}", images_dir.display());
    }

    let mut images = Vec::new();
    collect_svgs(&images_dir, Path::new(""), &mut images)?;

    if images.is_empty() {
        println!("no SVG images found under {}", images_dir.display());
        return Ok(());
    }

    let json = serde_json::to_string_pretty(&images)?;
    fs::write(&output, json)
        .with_context(|| format!("writing manifest {}", output.display()))?;
    println!("wrote {} image paths to {}", images.len(), output.display());
    Ok(())
}

fn collect_svgs(dir: &Path, relative: &Path, found: &mut Vec<String>) -> Result<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .collect::<Result<_, _>>()?;
    // Stable output regardless of filesystem enumeration order.
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let relative = relative.join(entry.file_name());
        if path.is_dir() {
            collect_svgs(&path, &relative, found)?;
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
        {
            found.push(format!("/images/{}", relative.display()));
        }
    }
    Ok(())
}

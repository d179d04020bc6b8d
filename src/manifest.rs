//! Gallery manifests.
//!
//! A manifest is the JSON description of one gallery: a title and an ordered
//! list of images. `scan` produces one from a directory; `render`,
//! `simulate` and `check` turn one into a [`Document`] of trigger links the
//! lightbox can attach to.
//!
//! ```json
//! {
//!   "title": "Iceland",
//!   "images": [
//!     { "href": "001-Glacier.jpg", "thumbnail": "thumbs/001-Glacier.jpg",
//!       "title": "Glacier at dawn", "alt": "Glacier" }
//!   ]
//! }
//! ```

use crate::dom::Document;
use maud::html;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Manifest has no images")]
    Empty,
    #[error("Image {0} has an empty href")]
    EmptyHref(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub title: String,
    #[serde(default)]
    pub images: Vec<ManifestImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestImage {
    /// Full-size image URL, opened in the lightbox.
    pub href: String,
    /// Thumbnail URL shown on the page. Falls back to `href`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Caption, written to the trigger's `title` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl Manifest {
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.images.is_empty() {
            return Err(ManifestError::Empty);
        }
        if let Some(index) = self.images.iter().position(|img| img.href.trim().is_empty()) {
            return Err(ManifestError::EmptyHref(index));
        }
        Ok(())
    }

    /// Number of images with a non-empty caption.
    pub fn caption_count(&self) -> usize {
        self.images
            .iter()
            .filter(|img| img.title.as_deref().is_some_and(|t| !t.is_empty()))
            .count()
    }
}

pub fn load_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    let content = fs::read_to_string(path)?;
    let manifest: Manifest = serde_json::from_str(&content)?;
    manifest.validate()?;
    Ok(manifest)
}

pub fn save_manifest(manifest: &Manifest, path: &Path) -> Result<(), ManifestError> {
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(path, json)?;
    Ok(())
}

/// Build a page for `manifest`: a heading and a `div.gallery` holding one
/// `a.{trigger_class}` link (wrapping the thumbnail) per image.
pub fn build_document(manifest: &Manifest, trigger_class: &str) -> Document {
    let mut doc = Document::new();
    let body = doc.body();

    if !manifest.title.is_empty() {
        let heading = doc.create_element("h1");
        let title = html! { (manifest.title) };
        doc.set_inner_html(heading, &title.into_string());
        doc.append_child(body, heading);
    }

    let gallery = doc.create_element("div");
    doc.add_class(gallery, "gallery");
    doc.append_child(body, gallery);

    for image in &manifest.images {
        let link = doc.create_element("a");
        doc.add_class(link, trigger_class);
        doc.set_attribute(link, "href", &image.href);
        if let Some(title) = &image.title {
            doc.set_attribute(link, "title", title);
        }

        let thumb = doc.create_element("img");
        doc.set_attribute(thumb, "src", image.thumbnail.as_deref().unwrap_or(&image.href));
        doc.set_attribute(thumb, "alt", image.alt.as_deref().unwrap_or_default());
        doc.append_child(link, thumb);
        doc.append_child(gallery, link);
    }
    doc
}

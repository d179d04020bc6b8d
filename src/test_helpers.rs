//! Shared test utilities.
//!
//! Document builders for gallery markup, plus a fixture helper that lays
//! out an image directory for the scanner.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut doc = gallery_document(3);
//! let lb = Lightbox::init(&mut doc, LightboxConfig::default()).unwrap();
//! assert_eq!(lb.len(), 3);
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::dom::{Document, NodeId};

// =========================================================================
// Documents
// =========================================================================

/// Append `n` trigger links with class `class` to `parent`.
///
/// Each link is `a.{class}[href=images/{prefix}-{i}.jpg][title=Caption {i}]`
/// wrapping `img[src=thumbs/{prefix}-{i}.jpg][alt=Thumbnail {i}]`.
pub fn append_triggers(
    doc: &mut Document,
    parent: NodeId,
    class: &str,
    prefix: &str,
    n: usize,
) -> Vec<NodeId> {
    (0..n)
        .map(|i| {
            let link = doc.create_element("a");
            doc.add_class(link, class);
            doc.set_attribute(link, "href", &format!("images/{prefix}-{i}.jpg"));
            doc.set_attribute(link, "title", &format!("Caption {i}"));

            let img = doc.create_element("img");
            doc.set_attribute(img, "src", &format!("thumbs/{prefix}-{i}.jpg"));
            doc.set_attribute(img, "alt", &format!("Thumbnail {i}"));
            doc.append_child(link, img);
            doc.append_child(parent, link);
            link
        })
        .collect()
}

/// A document whose body holds one `div.gallery` with `n` `.lightbox`
/// triggers.
pub fn gallery_document(n: usize) -> Document {
    let mut doc = Document::new();
    let gallery = doc.create_element("div");
    doc.add_class(gallery, "gallery");
    doc.append_child(doc.body(), gallery);
    append_triggers(&mut doc, gallery, "lightbox", "photo", n);
    doc
}

/// A document with two galleries: `a` triggers classed `.gallery-a` and `b`
/// triggers classed `.gallery-b`.
pub fn two_gallery_document(a: usize, b: usize) -> Document {
    let mut doc = Document::new();
    for (class, prefix, n) in [("gallery-a", "alpha", a), ("gallery-b", "beta", b)] {
        let section = doc.create_element("section");
        doc.append_child(doc.body(), section);
        append_triggers(&mut doc, section, class, prefix, n);
    }
    doc
}

// =========================================================================
// Filesystem fixtures
// =========================================================================

/// Create a temp directory containing `files`, each as `(relative path,
/// contents)`. Parent directories are created as needed.
pub fn image_dir(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (rel, contents) in files {
        write_file(tmp.path(), rel, contents);
    }
    tmp
}

pub fn write_file(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

//! Directory scanning: image files → gallery [`Manifest`].
//!
//! The filesystem is the data source. Every image under the root (at any
//! depth) becomes one manifest entry; its `href` is the path relative to the
//! root with `/` separators.
//!
//! ## Ordering
//!
//! Files follow the `NNN-name` convention: an optional numeric prefix sets
//! the position within a directory. Numbered files come first in numeric
//! order, then unnumbered files by name. Directories are visited in name
//! order. Two files with the same number in one directory are an error.
//!
//! ## Titles and thumbnails
//!
//! - **Caption**: a sidecar text file with the same stem
//!   (`001-Glacier.txt` next to `001-Glacier.jpg`), trimmed. Without one the
//!   caption is the display name: prefix stripped, dashes to spaces.
//! - **Alt text**: always the display name.
//! - **Thumbnail**: a file with the same name inside a `thumbs/` directory
//!   next to the image. `thumbs/` directories are never scanned as content.

use crate::manifest::{Manifest, ManifestImage};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "avif"];
pub const THUMBS_DIR: &str = "thumbs";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Duplicate image number {0} in {1}")]
    DuplicateNumber(u32, PathBuf),
    #[error("No images found in {0}")]
    NoImages(PathBuf),
}

/// A file stem split into its ordering number and name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryName<'a> {
    pub number: Option<u32>,
    pub name: &'a str,
}

impl<'a> EntryName<'a> {
    /// Split `010-Glacier-Lagoon` into `10` and `Glacier-Lagoon`.
    ///
    /// A digit run is only a prefix when it ends the stem or is followed by
    /// a dash: `2024photos` is an unnumbered name.
    pub fn parse(stem: &'a str) -> Self {
        let digits = stem.bytes().take_while(u8::is_ascii_digit).count();
        let unnumbered = Self {
            number: None,
            name: stem,
        };
        if digits == 0 {
            return unnumbered;
        }
        let (prefix, rest) = stem.split_at(digits);
        let name = match rest.strip_prefix('-') {
            Some(name) => name,
            None if rest.is_empty() => rest,
            None => return unnumbered,
        };
        match prefix.parse() {
            Ok(number) => Self {
                number: Some(number),
                name,
            },
            Err(_) => unnumbered,
        }
    }

    /// Human-readable name: dashes become spaces.
    pub fn display(&self) -> String {
        self.name.replace('-', " ")
    }
}

struct Found {
    dir: PathBuf,
    number: Option<u32>,
    stem: String,
    path: PathBuf,
}

/// Scan `root` for images and build a manifest titled after the directory.
pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut found = collect_images(root)?;
    if found.is_empty() {
        return Err(ScanError::NoImages(root.to_path_buf()));
    }
    check_duplicates(&found)?;
    found.sort_by(|a, b| {
        a.dir
            .cmp(&b.dir)
            .then(a.number.is_none().cmp(&b.number.is_none()))
            .then(a.number.cmp(&b.number))
            .then(a.stem.cmp(&b.stem))
    });

    let images = found
        .iter()
        .map(|f| build_image(root, f))
        .collect::<Result<Vec<_>, _>>()?;

    let dir_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let title = EntryName::parse(&dir_name).display();

    debug!(root = %root.display(), images = images.len(), "scan complete");
    Ok(Manifest { title, images })
}

fn collect_images(root: &Path) -> Result<Vec<Found>, ScanError> {
    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') && !(e.file_type().is_dir() && name == THUMBS_DIR)
        });

    let mut found = Vec::new();
    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_image(path) {
            continue;
        }
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        found.push(Found {
            dir: path.parent().unwrap_or(root).to_path_buf(),
            number: EntryName::parse(&stem).number,
            stem,
            path: path.to_path_buf(),
        });
    }
    Ok(found)
}

fn check_duplicates(found: &[Found]) -> Result<(), ScanError> {
    let mut seen = BTreeSet::new();
    for f in found {
        if let Some(number) = f.number {
            if !seen.insert((&f.dir, number)) {
                return Err(ScanError::DuplicateNumber(number, f.dir.clone()));
            }
        }
    }
    Ok(())
}

fn build_image(root: &Path, found: &Found) -> Result<ManifestImage, ScanError> {
    let display = EntryName::parse(&found.stem).display();
    let caption = read_sidecar(&found.path)?.unwrap_or_else(|| display.clone());

    let thumbnail = found
        .path
        .file_name()
        .map(|name| found.dir.join(THUMBS_DIR).join(name))
        .filter(|thumb| thumb.is_file())
        .map(|thumb| relative_url(root, &thumb));

    Ok(ManifestImage {
        href: relative_url(root, &found.path),
        thumbnail,
        title: (!caption.is_empty()).then_some(caption),
        alt: (!display.is_empty()).then_some(display),
    })
}

/// Contents of the `.txt` file next to `image`, trimmed. Missing or blank
/// sidecars yield `None`.
fn read_sidecar(image: &Path) -> Result<Option<String>, ScanError> {
    let sidecar = image.with_extension("txt");
    if !sidecar.is_file() {
        return Ok(None);
    }
    let text = fs::read_to_string(sidecar)?;
    let text = text.trim();
    Ok((!text.is_empty()).then(|| text.to_string()))
}

fn relative_url(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use pretty_assertions::assert_eq;

    fn hrefs(manifest: &Manifest) -> Vec<&str> {
        manifest.images.iter().map(|i| i.href.as_str()).collect()
    }

    // =========================================================================
    // Name parsing
    // =========================================================================

    #[test]
    fn numbered_name() {
        let n = EntryName::parse("020-Glacier-Lagoon");
        assert_eq!(n.number, Some(20));
        assert_eq!(n.name, "Glacier-Lagoon");
        assert_eq!(n.display(), "Glacier Lagoon");
    }

    #[test]
    fn number_only() {
        assert_eq!(EntryName::parse("007"), EntryName { number: Some(7), name: "" });
        assert_eq!(EntryName::parse("007-"), EntryName { number: Some(7), name: "" });
    }

    #[test]
    fn digits_without_dash_are_part_of_name() {
        let n = EntryName::parse("2024photos");
        assert_eq!(n.number, None);
        assert_eq!(n.name, "2024photos");
    }

    #[test]
    fn unnumbered_name_keeps_dashes_until_display() {
        let n = EntryName::parse("wip-drafts");
        assert_eq!(n.number, None);
        assert_eq!(n.display(), "wip drafts");
    }

    #[test]
    fn overflowing_prefix_is_unnumbered() {
        let n = EntryName::parse("99999999999-Big");
        assert_eq!(n.number, None);
    }

    // =========================================================================
    // Scanning
    // =========================================================================

    #[test]
    fn orders_numbered_before_unnumbered() {
        let tmp = image_dir(&[
            ("zebra.jpg", ""),
            ("010-Second.jpg", ""),
            ("002-First.png", ""),
            ("apple.JPG", ""),
            ("notes.md", ""),
        ]);
        let manifest = scan(tmp.path()).unwrap();
        assert_eq!(
            hrefs(&manifest),
            vec!["002-First.png", "010-Second.jpg", "apple.JPG", "zebra.jpg"]
        );
    }

    #[test]
    fn captions_from_sidecar_or_name() {
        let tmp = image_dir(&[
            ("001-Glacier.jpg", ""),
            ("001-Glacier.txt", "  Glacier at dawn\n"),
            ("002-Black-Beach.jpg", ""),
        ]);
        let manifest = scan(tmp.path()).unwrap();
        let first = &manifest.images[0];
        assert_eq!(first.title.as_deref(), Some("Glacier at dawn"));
        assert_eq!(first.alt.as_deref(), Some("Glacier"));
        let second = &manifest.images[1];
        assert_eq!(second.title.as_deref(), Some("Black Beach"));
    }

    #[test]
    fn blank_sidecar_falls_back_to_name() {
        let tmp = image_dir(&[("001-Fjord.jpg", ""), ("001-Fjord.txt", "   ")]);
        let manifest = scan(tmp.path()).unwrap();
        assert_eq!(manifest.images[0].title.as_deref(), Some("Fjord"));
    }

    #[test]
    fn number_only_file_has_no_caption() {
        let tmp = image_dir(&[("001.jpg", "")]);
        let manifest = scan(tmp.path()).unwrap();
        assert_eq!(manifest.images[0].title, None);
        assert_eq!(manifest.images[0].alt, None);
    }

    #[test]
    fn thumbnails_are_linked_and_not_scanned() {
        let tmp = image_dir(&[
            ("001-Glacier.jpg", ""),
            ("002-Cliffs.jpg", ""),
            ("thumbs/001-Glacier.jpg", ""),
        ]);
        let manifest = scan(tmp.path()).unwrap();
        assert_eq!(manifest.images.len(), 2);
        assert_eq!(
            manifest.images[0].thumbnail.as_deref(),
            Some("thumbs/001-Glacier.jpg")
        );
        assert_eq!(manifest.images[1].thumbnail, None);
    }

    #[test]
    fn nested_directories_use_relative_urls() {
        let tmp = image_dir(&[
            ("010-North/001-Ice.jpg", ""),
            ("001-South/002-Sand.jpg", ""),
            ("001-South/001-Dune.jpg", ""),
            (".hidden/001-Secret.jpg", ""),
        ]);
        let manifest = scan(tmp.path()).unwrap();
        assert_eq!(
            hrefs(&manifest),
            vec!["001-South/001-Dune.jpg", "001-South/002-Sand.jpg", "010-North/001-Ice.jpg"]
        );
    }

    #[test]
    fn duplicate_numbers_in_one_directory_fail() {
        let tmp = image_dir(&[("001-A.jpg", ""), ("001-B.jpg", "")]);
        assert!(matches!(scan(tmp.path()), Err(ScanError::DuplicateNumber(1, _))));
    }

    #[test]
    fn same_number_in_different_directories_is_fine() {
        let tmp = image_dir(&[("a/001-A.jpg", ""), ("b/001-B.jpg", "")]);
        assert_eq!(scan(tmp.path()).unwrap().images.len(), 2);
    }

    #[test]
    fn empty_directory_fails() {
        let tmp = image_dir(&[("readme.txt", "hi")]);
        assert!(matches!(scan(tmp.path()), Err(ScanError::NoImages(_))));
    }

    #[test]
    fn file_root_fails() {
        let tmp = image_dir(&[("001-A.jpg", "")]);
        let result = scan(&tmp.path().join("001-A.jpg"));
        assert!(matches!(result, Err(ScanError::NotADirectory(_))));
    }

    #[test]
    fn title_from_directory_name() {
        let tmp = image_dir(&[]);
        let root = tmp.path().join("020-Iceland-2024");
        write_file(&root, "001-A.jpg", "");
        assert_eq!(scan(&root).unwrap().title, "Iceland 2024");
    }
}

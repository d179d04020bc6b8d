//! CLI output formatting.
//!
//! Output is information-first: every entity (image, slide) is shown by its
//! positional index and title, with paths and status as indented context
//! lines.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Iceland (3 photos)
//! 001 Glacier at dawn
//!     Source: 001-Glacier.jpg
//!     Thumbnail: thumbs/001-Glacier.jpg
//! 002 (002.jpg)
//!     Source: 002.jpg
//! ```
//!
//! ## Simulate
//!
//! ```text
//! Step 001: click trigger:1
//!     Open 2/3
//!     Offset: translate3d(-100%, 0, 0)
//!     Focus: next
//!     Disabled: none
//!     Listeners: 12
//!     001 Glacier at dawn [loading]
//!     002 Black Beach [loading]
//!     003 Cliffs [loading]
//! ```
//!
//! ## Check
//!
//! ```text
//! Config: content/lightbox.toml
//! Manifest: 3 images, 2 captions
//! Selector: .lightbox (3 triggers)
//! Navigation: buttons shown
//! OK
//! ```
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::dom::{Document, NodeId};
use crate::lightbox::{Lightbox, Slide, SlideStatus};
use crate::manifest::Manifest;
use crate::render::inner_html;
use crate::script::Step;
use std::path::PathBuf;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Titled entries show the title, untitled ones the source in parens.
fn titled_line(index: usize, title: Option<&str>, source: &str) -> String {
    match title {
        Some(t) if !t.is_empty() => format!("{} {}", format_index(index), t),
        _ => format!("{} ({})", format_index(index), source),
    }
}

fn status_label(status: SlideStatus) -> &'static str {
    match status {
        SlideStatus::Pending => "pending",
        SlideStatus::Loading => "loading",
        SlideStatus::Loaded => "loaded",
        SlideStatus::Failed => "failed",
    }
}

/// Name `node` by its role in the lightbox.
fn describe_node(doc: &Document, lb: &Lightbox, node: NodeId) -> String {
    let overlay = lb.overlay();
    let named = [
        (overlay.prev, "prev"),
        (overlay.next, "next"),
        (overlay.close, "close"),
        (overlay.root, "overlay"),
        (doc.body(), "body"),
    ];
    if let Some((_, name)) = named.iter().find(|(id, _)| *id == node) {
        return name.to_string();
    }
    if let Some(i) = lb.items().iter().position(|item| item.trigger == node) {
        return format!("trigger:{i}");
    }
    doc.tag(node).unwrap_or("#markup").to_string()
}

fn slide_line(doc: &Document, index: usize, slide: &Slide) -> String {
    let caption = slide.caption.map(|c| inner_html(doc, c));
    let source = doc
        .attribute(slide.image, "src")
        .filter(|s| !s.is_empty())
        .or_else(|| doc.attribute(slide.image, "data-src"))
        .unwrap_or_default();
    format!(
        "{} [{}]",
        titled_line(index, caption.as_deref(), source),
        status_label(slide.status())
    )
}

// ============================================================================
// Scan
// ============================================================================

pub fn format_scan_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({} photos)",
        manifest.title,
        manifest.images.len()
    )];
    for (i, image) in manifest.images.iter().enumerate() {
        lines.push(titled_line(i + 1, image.title.as_deref(), &image.href));
        lines.push(format!("{}Source: {}", indent(1), image.href));
        if let Some(thumb) = &image.thumbnail {
            lines.push(format!("{}Thumbnail: {}", indent(1), thumb));
        }
    }
    lines
}

pub fn print_scan_output(manifest: &Manifest) {
    for line in format_scan_output(manifest) {
        println!("{line}");
    }
}

// ============================================================================
// Simulate
// ============================================================================

/// Snapshot of a lightbox's visible state.
pub fn format_state(doc: &Document, lb: &Lightbox) -> Vec<String> {
    let overlay = lb.overlay();
    let mut lines = Vec::new();

    if lb.is_open(doc) {
        lines.push(format!("Open {}/{}", lb.current_index() + 1, lb.len()));
    } else {
        lines.push("Closed".to_string());
    }

    let transform = lb.capabilities().transform_property;
    if let Some(offset) = doc.style(overlay.slider, transform) {
        lines.push(format!("Offset: {offset}"));
    }
    lines.push(format!(
        "Focus: {}",
        describe_node(doc, lb, doc.active_element())
    ));

    let disabled: Vec<&str> = [(overlay.prev, "prev"), (overlay.next, "next")]
        .into_iter()
        .filter(|(id, _)| doc.has_attribute(*id, "disabled"))
        .map(|(_, name)| name)
        .collect();
    lines.push(if disabled.is_empty() {
        "Disabled: none".to_string()
    } else {
        format!("Disabled: {}", disabled.join(", "))
    });

    lines.push(format!("Listeners: {}", doc.listener_count(lb.owner())));
    for (i, slide) in lb.slides().iter().enumerate() {
        lines.push(slide_line(doc, i + 1, slide));
    }
    lines
}

pub fn format_step(index: usize, step: &Step, doc: &Document, lb: &Lightbox) -> Vec<String> {
    let mut lines = vec![format!("Step {}: {}", format_index(index), step)];
    lines.extend(
        format_state(doc, lb)
            .into_iter()
            .map(|line| format!("{}{}", indent(1), line)),
    );
    lines
}

pub fn print_step(index: usize, step: &Step, doc: &Document, lb: &Lightbox) {
    for line in format_step(index, step, doc, lb) {
        println!("{line}");
    }
}

// ============================================================================
// Check
// ============================================================================

/// What `check` found.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    /// Config file used, `None` for stock defaults.
    pub config_file: Option<PathBuf>,
    pub images: usize,
    pub captions: usize,
    pub selector: String,
    pub triggers: usize,
    pub nav_shown: bool,
}

pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    let config = match &report.config_file {
        Some(path) => path.display().to_string(),
        None => "stock defaults".to_string(),
    };
    vec![
        format!("Config: {config}"),
        format!(
            "Manifest: {} images, {} captions",
            report.images, report.captions
        ),
        format!("Selector: {} ({} triggers)", report.selector, report.triggers),
        format!(
            "Navigation: {}",
            if report.nav_shown {
                "buttons shown"
            } else {
                "buttons hidden"
            }
        ),
        "OK".to_string(),
    ]
}

pub fn print_check_output(report: &CheckReport) {
    for line in format_check_output(report) {
        println!("{line}");
    }
}

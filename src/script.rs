//! Interaction scripts.
//!
//! A script is a JSON array of input steps replayed against one lightbox on
//! a [`Page`]. It drives the `simulate` command and doubles as a compact way
//! to describe user sessions in tests.
//!
//! ```json
//! [
//!   { "event": "click", "target": "trigger:2" },
//!   { "event": "load", "slide": 2 },
//!   { "event": "key", "key": "ArrowRight" },
//!   { "event": "swipe", "from": { "x": 300, "y": 200 }, "to": { "x": 100, "y": 200 } },
//!   { "event": "key", "key": 27 }
//! ]
//! ```
//!
//! Targets name nodes relative to the lightbox: `trigger:N`, `image:N`,
//! `wrapper:N`, `prev`, `next`, `close`, `overlay`, `counter`, `body`.

use crate::dom::NodeId;
use crate::events::Key;
use crate::gesture::Point;
use crate::page::{GalleryId, Page};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown target `{0}`")]
    UnknownTarget(String),
    #[error("Target `{target}` out of range: gallery has {len} items")]
    OutOfRange { target: Target, len: usize },
    #[error("No gallery attached")]
    NoGallery,
}

/// A node addressed relative to a lightbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Target {
    Trigger(usize),
    Image(usize),
    Wrapper(usize),
    Prev,
    Next,
    Close,
    Overlay,
    Counter,
    Body,
}

impl FromStr for Target {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ScriptError::UnknownTarget(s.to_string());
        if let Some((kind, index)) = s.split_once(':') {
            let index: usize = index.trim().parse().map_err(|_| unknown())?;
            return match kind.trim() {
                "trigger" => Ok(Target::Trigger(index)),
                "image" => Ok(Target::Image(index)),
                "wrapper" => Ok(Target::Wrapper(index)),
                _ => Err(unknown()),
            };
        }
        match s.trim() {
            "prev" => Ok(Target::Prev),
            "next" => Ok(Target::Next),
            "close" => Ok(Target::Close),
            "overlay" => Ok(Target::Overlay),
            "counter" => Ok(Target::Counter),
            "body" => Ok(Target::Body),
            _ => Err(unknown()),
        }
    }
}

impl TryFrom<String> for Target {
    type Error = ScriptError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Target> for String {
    fn from(target: Target) -> Self {
        target.to_string()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Trigger(i) => write!(f, "trigger:{i}"),
            Target::Image(i) => write!(f, "image:{i}"),
            Target::Wrapper(i) => write!(f, "wrapper:{i}"),
            Target::Prev => f.write_str("prev"),
            Target::Next => f.write_str("next"),
            Target::Close => f.write_str("close"),
            Target::Overlay => f.write_str("overlay"),
            Target::Counter => f.write_str("counter"),
            Target::Body => f.write_str("body"),
        }
    }
}

impl Target {
    /// Resolve to a node of `gallery` on `page`.
    pub fn resolve(self, page: &Page, gallery: GalleryId) -> Result<NodeId, ScriptError> {
        let lb = page.gallery(gallery).ok_or(ScriptError::NoGallery)?;
        let out_of_range = || ScriptError::OutOfRange {
            target: self,
            len: lb.len(),
        };
        let overlay = lb.overlay();
        Ok(match self {
            Target::Trigger(i) => lb.items().get(i).ok_or_else(out_of_range)?.trigger,
            Target::Image(i) => lb.slides().get(i).ok_or_else(out_of_range)?.image,
            Target::Wrapper(i) => lb.slides().get(i).ok_or_else(out_of_range)?.wrapper,
            Target::Prev => overlay.prev,
            Target::Next => overlay.next,
            Target::Close => overlay.close,
            Target::Overlay => overlay.root,
            Target::Counter => overlay.counter,
            Target::Body => page.document().body(),
        })
    }
}

/// A key given by name (`"ArrowLeft"`) or legacy code (`37`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeySpec {
    Code(u32),
    Name(String),
}

impl KeySpec {
    pub fn key(&self) -> Key {
        match self {
            KeySpec::Code(code) => Key::from_code(*code),
            KeySpec::Name(name) => Key::from_name(name),
        }
    }
}

fn default_gesture_target() -> Target {
    Target::Overlay
}

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Step {
    Click {
        target: Target,
    },
    /// Key press on the focused element.
    Key {
        key: KeySpec,
    },
    /// Touch start/move/end.
    Swipe {
        #[serde(default = "default_gesture_target")]
        target: Target,
        from: Point,
        to: Point,
    },
    /// Mouse down/move/up.
    Drag {
        #[serde(default = "default_gesture_target")]
        target: Target,
        from: Point,
        to: Point,
    },
    /// The image of slide N finished loading.
    Load {
        slide: usize,
    },
    /// The image of slide N failed to load.
    Error {
        slide: usize,
    },
    Focus {
        target: Target,
    },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Click { target } => write!(f, "click {target}"),
            Step::Key { key } => write!(f, "key {}", key.key()),
            Step::Swipe { target, from, to } => {
                write!(f, "swipe {target} ({}, {}) -> ({}, {})", from.x, from.y, to.x, to.y)
            }
            Step::Drag { target, from, to } => {
                write!(f, "drag {target} ({}, {}) -> ({}, {})", from.x, from.y, to.x, to.y)
            }
            Step::Load { slide } => write!(f, "load image:{slide}"),
            Step::Error { slide } => write!(f, "error image:{slide}"),
            Step::Focus { target } => write!(f, "focus {target}"),
        }
    }
}

pub fn parse_script(json: &str) -> Result<Vec<Step>, ScriptError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_script(path: &Path) -> Result<Vec<Step>, ScriptError> {
    let content = fs::read_to_string(path)?;
    parse_script(&content)
}

/// Replay one step against `gallery`.
pub fn run_step(page: &mut Page, gallery: GalleryId, step: &Step) -> Result<(), ScriptError> {
    match step {
        Step::Click { target } => {
            let node = target.resolve(page, gallery)?;
            page.click(node);
        }
        Step::Key { key } => {
            page.key(key.key());
        }
        Step::Swipe { target, from, to } => {
            let node = target.resolve(page, gallery)?;
            page.swipe(node, *from, *to);
        }
        Step::Drag { target, from, to } => {
            let node = target.resolve(page, gallery)?;
            page.drag(node, *from, *to);
        }
        Step::Load { slide } => {
            let node = Target::Image(*slide).resolve(page, gallery)?;
            page.image_loaded(node);
        }
        Step::Error { slide } => {
            let node = Target::Image(*slide).resolve(page, gallery)?;
            page.image_failed(node);
        }
        Step::Focus { target } => {
            let node = target.resolve(page, gallery)?;
            page.focus(node);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LightboxConfig;
    use crate::test_helpers::gallery_document;

    fn page(n: usize) -> (Page, GalleryId) {
        let mut page = Page::new(gallery_document(n));
        let id = page.attach(LightboxConfig::default()).unwrap();
        (page, id)
    }

    #[test]
    fn parses_targets() {
        assert_eq!("trigger:3".parse::<Target>().unwrap(), Target::Trigger(3));
        assert_eq!("wrapper: 1".parse::<Target>().unwrap(), Target::Wrapper(1));
        assert_eq!("close".parse::<Target>().unwrap(), Target::Close);
        assert!(matches!(
            "slide:1".parse::<Target>(),
            Err(ScriptError::UnknownTarget(_))
        ));
        assert!("trigger:x".parse::<Target>().is_err());
        assert!("nowhere".parse::<Target>().is_err());
    }

    #[test]
    fn target_display_parses_back() {
        for t in [Target::Image(4), Target::Prev, Target::Counter, Target::Body] {
            assert_eq!(t.to_string().parse::<Target>().unwrap(), t);
        }
    }

    #[test]
    fn parses_steps() {
        let steps = parse_script(
            r#"[
                {"event": "click", "target": "trigger:0"},
                {"event": "key", "key": "Right"},
                {"event": "key", "key": 27},
                {"event": "swipe", "from": {"x": 10, "y": 0}, "to": {"x": 50, "y": 0}},
                {"event": "drag", "target": "image:1", "from": {"x": 0, "y": 0}, "to": {"x": 5, "y": 0}},
                {"event": "load", "slide": 2},
                {"event": "error", "slide": 1},
                {"event": "focus", "target": "body"}
            ]"#,
        )
        .unwrap();
        assert_eq!(steps.len(), 8);
        assert_eq!(steps[1], Step::Key { key: KeySpec::Name("Right".into()) });
        assert_eq!(steps[2].to_string(), "key Escape");
        assert!(matches!(steps[3], Step::Swipe { target: Target::Overlay, .. }));
        assert_eq!(steps[4].to_string(), "drag image:1 (0, 0) -> (5, 0)");
    }

    #[test]
    fn rejects_unknown_event_and_target() {
        assert!(parse_script(r#"[{"event": "hover", "target": "prev"}]"#).is_err());
        assert!(parse_script(r#"[{"event": "click", "target": "sidebar"}]"#).is_err());
    }

    #[test]
    fn replays_a_session() {
        let (mut page, id) = page(4);
        let steps = parse_script(
            r#"[
                {"event": "click", "target": "trigger:1"},
                {"event": "load", "slide": 1},
                {"event": "click", "target": "next"},
                {"event": "swipe", "target": "image:2", "from": {"x": 300, "y": 0}, "to": {"x": 100, "y": 0}},
                {"event": "key", "key": "ArrowLeft"}
            ]"#,
        )
        .unwrap();
        for step in &steps {
            run_step(&mut page, id, step).unwrap();
        }
        let lb = page.gallery(id).unwrap();
        assert!(lb.is_open(page.document()));
        assert_eq!(lb.current_index(), 2);
        let image = lb.slides()[1].image;
        assert_eq!(page.document().style(image, "opacity"), Some("1"));

        run_step(&mut page, id, &Step::Key { key: KeySpec::Code(27) }).unwrap();
        assert!(!page.gallery(id).unwrap().is_open(page.document()));
    }

    #[test]
    fn out_of_range_target_is_an_error() {
        let (mut page, id) = page(2);
        let err = run_step(&mut page, id, &Step::Click { target: Target::Trigger(5) }).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Target `trigger:5` out of range: gallery has 2 items"
        );
    }

    #[test]
    fn missing_gallery_is_an_error() {
        let mut page = Page::new(gallery_document(1));
        let result = run_step(&mut page, GalleryId::default(), &Step::Click { target: Target::Close });
        assert!(matches!(result, Err(ScriptError::NoGallery)));
    }
}

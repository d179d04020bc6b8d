//! Input events consumed by the lightbox.
//!
//! Events are plain values: the host (see [`crate::page::Page`]) hands them
//! to [`Document::route`](crate::dom::Document::route), which resolves the
//! listeners on the propagation path, and then delivers each one to the
//! lightbox that registered it. Each listener carries a [`Handler`] tag that
//! says which piece of controller logic should run.

use crate::dom::NodeId;
use crate::gesture::Point;
use std::fmt;

/// The type of an event, used to match listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyDown,
    TouchStart,
    TouchMove,
    TouchEnd,
    MouseDown,
    MouseMove,
    MouseUp,
    MouseLeave,
    Focus,
    Load,
    Error,
}

impl EventKind {
    /// Whether the event bubbles from its target up to the document.
    ///
    /// `mouseleave`, `focus`, `load` and `error` only reach capturing
    /// listeners on the way down and listeners on the target itself.
    pub fn bubbles(self) -> bool {
        !matches!(
            self,
            EventKind::MouseLeave | EventKind::Focus | EventKind::Load | EventKind::Error
        )
    }
}

/// Keys the lightbox reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other(String),
}

impl Key {
    /// Decode a `KeyboardEvent.key` name, accepting the legacy IE/Edge
    /// spellings (`Left`, `Right`, `Esc`).
    pub fn from_name(name: &str) -> Key {
        match name {
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "Escape" | "Esc" => Key::Escape,
            other => Key::Other(other.to_string()),
        }
    }

    /// Decode a legacy `keyCode`.
    pub fn from_code(code: u32) -> Key {
        match code {
            37 => Key::ArrowLeft,
            39 => Key::ArrowRight,
            27 => Key::Escape,
            other => Key::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::ArrowLeft => f.write_str("ArrowLeft"),
            Key::ArrowRight => f.write_str("ArrowRight"),
            Key::Escape => f.write_str("Escape"),
            Key::Other(name) => f.write_str(name),
        }
    }
}

/// A single input event aimed at a node.
///
/// Pointer coordinates are page coordinates (`pageX` / `pageY`).
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Click { target: NodeId },
    KeyDown { target: NodeId, key: Key },
    TouchStart { target: NodeId, point: Point },
    TouchMove { target: NodeId, point: Point },
    TouchEnd { target: NodeId },
    MouseDown { target: NodeId, point: Point },
    MouseMove { target: NodeId, point: Point },
    MouseUp { target: NodeId, point: Point },
    MouseLeave { target: NodeId, point: Point },
    Focus { target: NodeId },
    Load { target: NodeId },
    Error { target: NodeId },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Click { .. } => EventKind::Click,
            Event::KeyDown { .. } => EventKind::KeyDown,
            Event::TouchStart { .. } => EventKind::TouchStart,
            Event::TouchMove { .. } => EventKind::TouchMove,
            Event::TouchEnd { .. } => EventKind::TouchEnd,
            Event::MouseDown { .. } => EventKind::MouseDown,
            Event::MouseMove { .. } => EventKind::MouseMove,
            Event::MouseUp { .. } => EventKind::MouseUp,
            Event::MouseLeave { .. } => EventKind::MouseLeave,
            Event::Focus { .. } => EventKind::Focus,
            Event::Load { .. } => EventKind::Load,
            Event::Error { .. } => EventKind::Error,
        }
    }

    pub fn target(&self) -> NodeId {
        match *self {
            Event::Click { target }
            | Event::KeyDown { target, .. }
            | Event::TouchStart { target, .. }
            | Event::TouchMove { target, .. }
            | Event::TouchEnd { target }
            | Event::MouseDown { target, .. }
            | Event::MouseMove { target, .. }
            | Event::MouseUp { target, .. }
            | Event::MouseLeave { target, .. }
            | Event::Focus { target }
            | Event::Load { target }
            | Event::Error { target } => target,
        }
    }

    pub fn point(&self) -> Option<Point> {
        match *self {
            Event::TouchStart { point, .. }
            | Event::TouchMove { point, .. }
            | Event::MouseDown { point, .. }
            | Event::MouseMove { point, .. }
            | Event::MouseUp { point, .. }
            | Event::MouseLeave { point, .. } => Some(point),
            _ => None,
        }
    }
}

/// Which controller routine a registered listener runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// Trigger element click: open at the item index.
    Open(usize),
    /// Click on a prev/next/close control or on the overlay.
    Control,
    KeyDown,
    TouchStart,
    TouchMove,
    TouchEnd,
    MouseDown,
    MouseMove,
    MouseUp,
    MouseLeave,
    /// Document-level capturing focus listener.
    TrapFocus,
    /// Image of the slide at this index finished loading.
    ImageLoad(usize),
    /// Image of the slide at this index failed to load.
    ImageError(usize),
}

/// What a handler asks the dispatcher to do after it ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Propagation {
    pub stop: bool,
    pub prevent_default: bool,
}

impl Propagation {
    pub const CONTINUE: Propagation = Propagation {
        stop: false,
        prevent_default: false,
    };

    pub fn stop() -> Self {
        Self {
            stop: true,
            prevent_default: false,
        }
    }

    pub fn prevent_default() -> Self {
        Self {
            stop: false,
            prevent_default: true,
        }
    }

    pub fn stop_and_prevent() -> Self {
        Self {
            stop: true,
            prevent_default: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_names_decode() {
        assert_eq!(Key::from_name("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_name("Right"), Key::ArrowRight);
        assert_eq!(Key::from_name("Esc"), Key::Escape);
        assert_eq!(Key::from_name("Enter"), Key::Other("Enter".to_string()));
    }

    #[test]
    fn legacy_key_codes_decode() {
        assert_eq!(Key::from_code(37), Key::ArrowLeft);
        assert_eq!(Key::from_code(39), Key::ArrowRight);
        assert_eq!(Key::from_code(27), Key::Escape);
        assert!(matches!(Key::from_code(13), Key::Other(_)));
    }

    #[test]
    fn non_bubbling_kinds() {
        assert!(EventKind::Click.bubbles());
        assert!(EventKind::TouchEnd.bubbles());
        assert!(!EventKind::Focus.bubbles());
        assert!(!EventKind::MouseLeave.bubbles());
        assert!(!EventKind::Load.bubbles());
    }

    #[test]
    fn event_exposes_target_and_point() {
        let target = NodeId::from_raw(4);
        let event = Event::MouseMove {
            target,
            point: Point::new(3.0, 7.0),
        };
        assert_eq!(event.kind(), EventKind::MouseMove);
        assert_eq!(event.target(), target);
        assert_eq!(event.point(), Some(Point::new(3.0, 7.0)));
        assert_eq!(Event::TouchEnd { target }.point(), None);
    }
}

//! # Simple Lightbox
//!
//! A headless image lightbox. Given a page of trigger links (usually anchors
//! wrapping thumbnails), it builds an overlay presenting a horizontally
//! swipeable slider of full-size images with captions, a counter and
//! prev/next/close buttons, and drives it from clicks, keys, touch and mouse
//! gestures.
//!
//! Everything runs against an in-crate document model instead of a browser,
//! so the same controller renders gallery markup server-side, replays
//! scripted sessions from the command line, and is tested by inspecting the
//! document it writes.
//!
//! ```text
//! Page ── owns ── Document (nodes, focus, listeners)
//!   │                 ▲
//!   └── Lightbox ─────┘  init / open / close / next / prev / load
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`dom`] | Node arena, attributes, classes, inline style, focus, listener registry and event routing |
//! | [`selector`] | CSS selector subset used to find trigger elements |
//! | [`events`] | Input events, key decoding, handler tags, propagation flags |
//! | [`gesture`] | Drag tracking and swipe interpretation |
//! | [`lightbox`] | The gallery controller |
//! | [`page`] | Host owning a document and its lightboxes; event dispatch |
//! | [`config`] | Options, `lightbox.toml` loading and merging, JSON options, validation |
//! | [`manifest`] | Gallery manifest JSON and the page built from it |
//! | [`scan`] | Image directory → manifest, `NNN-name` ordering |
//! | [`render`] | HTML serialization with Maud |
//! | [`script`] | JSON interaction scripts replayed against a page |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Handler Tags Instead of Closures
//!
//! Listeners store a [`events::Handler`] value rather than a boxed closure.
//! The controller matches on the tag when [`page::Page`] delivers an event.
//! Nothing holds a reference back into the controller, so the document and
//! its lightboxes can be borrowed independently and listener sets can be
//! counted and compared in tests.
//!
//! ## Build Once, Update Narrowly
//!
//! The overlay and every slide are created at init. Afterwards only a few
//! routines write to the document: slider offset, counter text, disabled and
//! focus state, lazy image sources, the scroll lock class and `aria-hidden`.
//!
//! ## Scoped Runtime Listeners
//!
//! Keyboard, pointer, control and focus-trap listeners exist only while the
//! overlay is open. They are acquired as one set on open and released as one
//! set on close, so an open/close cycle leaves the listener registry exactly
//! as it found it.
//!
//! ## Gestures
//!
//! One threshold applies to both axes. A downward swipe closes the overlay
//! when `swipe_close` is on; the check uses the vertical delta. Mouse drags
//! track the horizontal axis only.

pub mod config;
pub mod dom;
pub mod events;
pub mod gesture;
pub mod lightbox;
pub mod manifest;
pub mod output;
pub mod page;
pub mod render;
pub mod scan;
pub mod script;
pub mod selector;

#[cfg(test)]
pub(crate) mod test_helpers;

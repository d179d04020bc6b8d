//! The gallery controller.
//!
//! A [`Lightbox`] is attached to a [`Document`] once. Initialization finds
//! the trigger elements, decorates them, and builds the overlay: a dialog
//! holding the slider track (one slide per trigger), the prev/next/close
//! buttons and the counter. After that the document only changes through a
//! handful of update routines (offset, counter, focus/disabled state, lazy
//! image loading, scroll lock and visibility).
//!
//! ## Overlay structure
//!
//! ```text
//! div.slb-overlay[role=dialog][aria-hidden]
//! ├── div.slb-slider                     translate3d(-index * 100%, 0, 0)
//! │   └── div.slb-slide                  one per trigger
//! │       └── div.slb-figure-wrapper
//! │           └── figure
//! │               ├── div.slb-loader     removed once the image loads
//! │               ├── img[data-src]      src assigned on first load
//! │               └── figcaption         only when a caption exists
//! ├── button[aria-label=Previous]
//! ├── button[aria-label=Next]
//! ├── button[aria-label=Close]
//! └── div.slb-counter                    "3/5"
//! ```
//!
//! ## Lifecycle
//!
//! The overlay is either closed (`aria-hidden="true"`) or open. Opening binds
//! the runtime listeners as one [`Subscriptions`] set; closing releases the
//! whole set. Trigger click listeners live for the lifetime of the document.
//!
//! Every state change is logged with `tracing` at debug level.

use crate::config::{CaptionSource, ConfigError, LightboxConfig, NavMode};
use crate::dom::{Delivery, Document, ListenerId, ListenerTarget, NodeId, OwnerId};
use crate::events::{Event, EventKind, Handler, Key, Propagation};
use crate::gesture::{DragTracker, GestureAction, PointerKind};
use crate::selector::{Selector, SelectorError};
use thiserror::Error;
use tracing::{debug, warn};

/// Class added to every trigger element.
pub const TRIGGER_CLASS: &str = "slb";
/// Class added to triggers that received a zoom icon.
pub const ZOOM_CLASS: &str = "slb--zoom";
pub const ZOOM_ICON_CLASS: &str = "slb__zoom-icon";
/// Class added to `<html>` and `<body>` while scrolling is locked.
pub const OPEN_CLASS: &str = "slb--is-open";
pub const OVERLAY_CLASS: &str = "slb-overlay";
pub const SLIDER_CLASS: &str = "slb-slider";
pub const SLIDE_CLASS: &str = "slb-slide";
pub const FIGURE_WRAPPER_CLASS: &str = "slb-figure-wrapper";
pub const LOADER_CLASS: &str = "slb-loader";
pub const COUNTER_CLASS: &str = "slb-counter";
/// Class added to a figure whose image failed to load.
pub const ERROR_CLASS: &str = "slb-figure--error";
/// Attribute holding a slide's deferred image URL.
pub const DEFERRED_SRC: &str = "data-src";

const CURSOR_GRAB: &str = "grab";
const CURSOR_GRABBING: &str = "grabbing";

#[derive(Error, Debug)]
pub enum LightboxError {
    #[error("No elements match selector `{0}`")]
    NoMatch(String),
    #[error("Selector error: {0}")]
    Selector(#[from] SelectorError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Platform features resolved once at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Style property used for the slider offset.
    pub transform_property: &'static str,
    /// Whether the device reports touch support.
    pub touch: bool,
}

impl Capabilities {
    pub fn detect(doc: &Document) -> Self {
        let transform_property = if doc.supports_style("transform") {
            "transform"
        } else {
            "-webkit-transform"
        };
        Self {
            transform_property,
            touch: doc.is_touch(),
        }
    }
}

/// Direction hint for focus placement after a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// A trigger element and its position in the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryItem {
    pub trigger: NodeId,
}

/// Load progress of a slide's image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideStatus {
    /// `data-src` still deferred.
    Pending,
    /// `src` assigned, waiting for the load event.
    Loading,
    Loaded,
    Failed,
}

/// The nodes making up one slide.
#[derive(Debug, Clone)]
pub struct Slide {
    pub root: NodeId,
    pub wrapper: NodeId,
    pub figure: NodeId,
    pub loader: NodeId,
    pub image: NodeId,
    pub caption: Option<NodeId>,
    status: SlideStatus,
    /// Load and error listeners, registered when the load is issued.
    pending: Option<[ListenerId; 2]>,
}

impl Slide {
    pub fn status(&self) -> SlideStatus {
        self.status
    }
}

/// The overlay controls shared by all slides.
#[derive(Debug, Clone, Copy)]
pub struct Overlay {
    pub root: NodeId,
    pub slider: NodeId,
    pub prev: NodeId,
    pub next: NodeId,
    pub close: NodeId,
    pub counter: NodeId,
}

/// Runtime listeners bound while the overlay is open.
///
/// Acquired as a whole on open and released as a whole on close, so every
/// close path removes exactly what open added.
#[derive(Debug)]
pub struct Subscriptions {
    ids: Vec<ListenerId>,
}

impl Subscriptions {
    fn acquire(
        doc: &mut Document,
        owner: OwnerId,
        config: &LightboxConfig,
        overlay: &Overlay,
    ) -> Self {
        let mut ids = Vec::new();
        let mut bind = |doc: &mut Document, target, kind, capture, handler| {
            ids.push(doc.add_listener(owner, target, kind, capture, handler));
        };
        let root = ListenerTarget::Node(overlay.root);

        if config.keyboard {
            bind(doc, ListenerTarget::Document, EventKind::KeyDown, false, Handler::KeyDown);
        }
        if config.doc_close {
            bind(doc, root, EventKind::Click, false, Handler::Control);
        }
        for button in [overlay.prev, overlay.next, overlay.close] {
            bind(doc, ListenerTarget::Node(button), EventKind::Click, false, Handler::Control);
        }
        if config.draggable {
            bind(doc, root, EventKind::TouchStart, false, Handler::TouchStart);
            bind(doc, root, EventKind::TouchMove, false, Handler::TouchMove);
            bind(doc, root, EventKind::TouchEnd, false, Handler::TouchEnd);
            bind(doc, root, EventKind::MouseDown, false, Handler::MouseDown);
            bind(doc, root, EventKind::MouseUp, false, Handler::MouseUp);
            bind(doc, root, EventKind::MouseLeave, false, Handler::MouseLeave);
            bind(doc, root, EventKind::MouseMove, false, Handler::MouseMove);
        }
        bind(doc, ListenerTarget::Document, EventKind::Focus, true, Handler::TrapFocus);

        Self { ids }
    }

    fn release(self, doc: &mut Document) {
        for id in self.ids {
            doc.remove_listener(id);
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// One lightbox instance bound to a document.
#[derive(Debug)]
pub struct Lightbox {
    owner: OwnerId,
    config: LightboxConfig,
    caps: Capabilities,
    items: Vec<GalleryItem>,
    slides: Vec<Slide>,
    overlay: Overlay,
    nav_shown: bool,
    current_index: usize,
    drag: DragTracker,
    last_focus: Option<NodeId>,
    subscriptions: Option<Subscriptions>,
}

impl Lightbox {
    /// Attach a lightbox to every element matching `config.selector`.
    ///
    /// Fails without touching the document if the config is invalid or the
    /// selector matches nothing.
    pub fn init(doc: &mut Document, config: LightboxConfig) -> Result<Self, LightboxError> {
        config.validate()?;
        let selector = Selector::parse(&config.selector)?;
        let elements = doc.query_selector_all(&selector);
        if elements.is_empty() {
            return Err(LightboxError::NoMatch(config.selector.clone()));
        }

        let caps = Capabilities::detect(doc);
        let owner = doc.new_owner();

        let items: Vec<GalleryItem> = elements
            .iter()
            .enumerate()
            .map(|(index, &trigger)| {
                decorate_trigger(doc, &config, trigger);
                doc.add_listener(
                    owner,
                    ListenerTarget::Node(trigger),
                    EventKind::Click,
                    true,
                    Handler::Open(index),
                );
                GalleryItem { trigger }
            })
            .collect();

        let overlay = build_overlay(doc);
        let slides = build_slides(doc, &config, owner, &items, &overlay);
        let nav_shown = configure_controls(doc, &config, caps, items.len(), &overlay);

        debug!(
            owner = owner.get(),
            selector = %selector,
            items = items.len(),
            transform = caps.transform_property,
            "lightbox initialized"
        );

        let drag = DragTracker::new(config.threshold, config.swipe_close);
        Ok(Self {
            owner,
            config,
            caps,
            items,
            slides,
            overlay,
            nav_shown,
            current_index: 0,
            drag,
            last_focus: None,
            subscriptions: None,
        })
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn config(&self) -> &LightboxConfig {
        &self.config
    }

    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }

    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Whether prev/next buttons are visible.
    pub fn nav_shown(&self) -> bool {
        self.nav_shown
    }

    pub fn is_open(&self, doc: &Document) -> bool {
        doc.attribute(self.overlay.root, "aria-hidden") == Some("false")
    }

    /// Runtime listeners currently bound (zero while closed).
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.as_ref().map_or(0, Subscriptions::len)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    // ------------------------------------------------------------------
    // Open / close
    // ------------------------------------------------------------------

    /// Open the overlay at `index`.
    ///
    /// Returns `false` if the overlay is already open or `index` is out of
    /// range; neither changes any state.
    pub fn open(&mut self, doc: &mut Document, index: usize) -> bool {
        if self.is_open(doc) {
            return false;
        }
        if index >= self.items.len() {
            warn!(owner = self.owner.get(), index, len = self.items.len(), "open index out of range");
            return false;
        }

        if !self.config.scroll {
            doc.add_class(doc.root(), OPEN_CLASS);
            doc.add_class(doc.body(), OPEN_CLASS);
        }

        self.last_focus = Some(doc.active_element());
        self.current_index = index;
        self.drag.reset();
        self.subscriptions = Some(Subscriptions::acquire(
            doc,
            self.owner,
            &self.config,
            &self.overlay,
        ));

        self.load(doc, index);
        self.preload(doc, Some(index + 1));
        self.preload(doc, index.checked_sub(1));

        self.update_offset(doc);
        self.update_counter(doc);
        doc.set_attribute(self.overlay.root, "aria-hidden", "false");
        self.update_focus(doc, None);

        debug!(owner = self.owner.get(), index, "lightbox opened");
        true
    }

    /// Close the overlay. Returns `false` if it was already closed.
    pub fn close(&mut self, doc: &mut Document) -> bool {
        if !self.is_open(doc) {
            return false;
        }

        if !self.config.scroll {
            doc.remove_class(doc.root(), OPEN_CLASS);
            doc.remove_class(doc.body(), OPEN_CLASS);
        }

        if let Some(subscriptions) = self.subscriptions.take() {
            subscriptions.release(doc);
        }
        // The release event of a drag cut short by closing never arrives.
        self.drag.reset();
        if self.config.draggable {
            doc.set_style(self.overlay.slider, "cursor", CURSOR_GRAB);
        }
        doc.set_attribute(self.overlay.root, "aria-hidden", "true");

        if let Some(previous) = self.last_focus.take() {
            doc.focus(previous);
        }

        debug!(owner = self.owner.get(), index = self.current_index, "lightbox closed");
        true
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Advance one slide. No-op (returns `false`) on the last slide.
    pub fn next(&mut self, doc: &mut Document) -> bool {
        if self.current_index + 1 >= self.items.len() {
            return false;
        }
        self.current_index += 1;
        self.after_move(doc);
        self.preload(doc, Some(self.current_index + 1));
        true
    }

    /// Go back one slide. No-op (returns `false`) on the first slide.
    pub fn prev(&mut self, doc: &mut Document) -> bool {
        if self.current_index == 0 {
            return false;
        }
        self.current_index -= 1;
        self.after_move(doc);
        self.preload(doc, self.current_index.checked_sub(1));
        true
    }

    fn after_move(&mut self, doc: &mut Document) {
        self.update_offset(doc);
        self.update_counter(doc);
        self.update_focus(doc, None);
        debug!(owner = self.owner.get(), index = self.current_index, "slide changed");
    }

    fn update_offset(&self, doc: &mut Document) {
        let offset = -(self.current_index as i64) * 100;
        doc.set_style(
            self.overlay.slider,
            self.caps.transform_property,
            &format!("translate3d({offset}%, 0, 0)"),
        );
    }

    fn update_counter(&self, doc: &mut Document) {
        let text = format!("{}/{}", self.current_index + 1, self.items.len());
        doc.set_inner_html(self.overlay.counter, &text);
    }

    /// Refresh the disabled state of prev/next and move focus to the control
    /// the user most likely wants next.
    pub fn update_focus(&self, doc: &mut Document, direction: Option<Direction>) {
        let at_start = self.current_index == 0;
        let at_end = self.current_index + 1 >= self.items.len();
        doc.set_flag(self.overlay.prev, "disabled", at_start);
        doc.set_flag(self.overlay.next, "disabled", at_end);

        if self.nav_shown {
            if !at_end && direction != Some(Direction::Left) {
                doc.focus(self.overlay.next);
            } else {
                doc.focus(self.overlay.prev);
            }
        } else if self.config.close {
            doc.focus(self.overlay.close);
        }
    }

    // ------------------------------------------------------------------
    // Lazy loading
    // ------------------------------------------------------------------

    /// Start loading the image of slide `index`.
    ///
    /// Returns `true` if a load was issued. Slides whose image no longer has
    /// a deferred source (already requested) and out-of-range indices are
    /// skipped.
    pub fn load(&mut self, doc: &mut Document, index: usize) -> bool {
        let owner = self.owner;
        let Some(slide) = self.slides.get_mut(index) else {
            return false;
        };
        let Some(url) = doc.attribute(slide.image, DEFERRED_SRC).map(str::to_owned) else {
            return false;
        };

        let image = ListenerTarget::Node(slide.image);
        let on_load = doc.add_listener(owner, image, EventKind::Load, false, Handler::ImageLoad(index));
        let on_error =
            doc.add_listener(owner, image, EventKind::Error, false, Handler::ImageError(index));
        slide.pending = Some([on_load, on_error]);

        doc.set_attribute(slide.image, "src", &url);
        doc.remove_attribute(slide.image, DEFERRED_SRC);
        slide.status = SlideStatus::Loading;

        debug!(owner = owner.get(), index, url = %url, "image load issued");
        true
    }

    fn preload(&mut self, doc: &mut Document, index: Option<usize>) {
        if let Some(index) = index {
            self.load(doc, index);
        }
    }

    /// The image of slide `index` finished loading: drop the placeholder
    /// and fade the image (and caption) in.
    pub fn image_loaded(&mut self, doc: &mut Document, index: usize) {
        let Some(slide) = self.slides.get_mut(index) else {
            return;
        };
        if slide.status != SlideStatus::Loading {
            return;
        }
        settle(doc, slide);
        doc.set_style(slide.image, "opacity", "1");
        if let Some(caption) = slide.caption {
            doc.set_style(caption, "opacity", "1");
        }
        slide.status = SlideStatus::Loaded;
    }

    /// The image of slide `index` failed: drop the placeholder and flag the
    /// figure so the failure is visible instead of an endless spinner.
    pub fn image_failed(&mut self, doc: &mut Document, index: usize) {
        let Some(slide) = self.slides.get_mut(index) else {
            return;
        };
        if slide.status != SlideStatus::Loading {
            return;
        }
        settle(doc, slide);
        doc.add_class(slide.figure, ERROR_CLASS);
        slide.status = SlideStatus::Failed;
        warn!(owner = self.owner.get(), index, "image failed to load");
    }

    // ------------------------------------------------------------------
    // Event handling
    // ------------------------------------------------------------------

    /// Run the handler of a routed listener.
    pub fn handle(&mut self, doc: &mut Document, delivery: &Delivery, event: &Event) -> Propagation {
        match delivery.handler {
            Handler::Open(index) => {
                self.open(doc, index);
                Propagation::prevent_default()
            }
            Handler::Control => {
                self.on_control_click(doc, delivery.current_target, event.target());
                Propagation::prevent_default()
            }
            Handler::KeyDown => {
                if let Event::KeyDown { key, .. } = event {
                    self.on_key(doc, key);
                }
                Propagation::CONTINUE
            }
            Handler::TouchStart => {
                if let Some(point) = event.point() {
                    self.drag.press(PointerKind::Touch, point);
                }
                Propagation::stop()
            }
            Handler::TouchMove => {
                if let Some(point) = event.point() {
                    self.drag.track(PointerKind::Touch, point);
                }
                Propagation::stop()
            }
            Handler::TouchEnd => {
                let action = self.drag.release();
                self.apply_gesture(doc, action);
                Propagation::stop()
            }
            Handler::MouseDown => {
                if let Some(point) = event.point() {
                    self.drag.press(PointerKind::Mouse, point);
                }
                Propagation::stop_and_prevent()
            }
            Handler::MouseMove => {
                if let Some(point) = event.point() {
                    if self.drag.track(PointerKind::Mouse, point) {
                        doc.set_style(self.overlay.slider, "cursor", CURSOR_GRABBING);
                    }
                }
                Propagation::prevent_default()
            }
            Handler::MouseUp => {
                doc.set_style(self.overlay.slider, "cursor", CURSOR_GRAB);
                let action = self.drag.release();
                self.apply_gesture(doc, action);
                Propagation::stop()
            }
            Handler::MouseLeave => {
                if let Some(point) = event.point() {
                    if self.drag.is_active() {
                        doc.set_style(self.overlay.slider, "cursor", CURSOR_GRAB);
                        let action = self.drag.leave(PointerKind::Mouse, point);
                        self.apply_gesture(doc, action);
                    }
                }
                Propagation::CONTINUE
            }
            Handler::TrapFocus => {
                if self.is_open(doc) && !doc.contains(self.overlay.root, event.target()) {
                    self.update_focus(doc, None);
                    Propagation::stop()
                } else {
                    Propagation::CONTINUE
                }
            }
            Handler::ImageLoad(index) => {
                self.image_loaded(doc, index);
                Propagation::CONTINUE
            }
            Handler::ImageError(index) => {
                self.image_failed(doc, index);
                Propagation::CONTINUE
            }
        }
    }

    fn on_control_click(&mut self, doc: &mut Document, current: ListenerTarget, target: NodeId) {
        let ListenerTarget::Node(current) = current else {
            return;
        };
        if current == self.overlay.prev {
            self.prev(doc);
            self.update_focus(doc, Some(Direction::Left));
        } else if current == self.overlay.next {
            self.next(doc);
            self.update_focus(doc, Some(Direction::Right));
        } else if current == self.overlay.close
            || (current == self.overlay.root && self.slides.iter().any(|s| s.wrapper == target))
        {
            self.close(doc);
        }
    }

    fn on_key(&mut self, doc: &mut Document, key: &Key) {
        match key {
            Key::ArrowLeft => {
                self.prev(doc);
                self.update_focus(doc, Some(Direction::Left));
            }
            Key::ArrowRight => {
                self.next(doc);
                self.update_focus(doc, Some(Direction::Right));
            }
            Key::Escape => {
                self.close(doc);
            }
            Key::Other(_) => {}
        }
    }

    fn apply_gesture(&mut self, doc: &mut Document, action: Option<GestureAction>) {
        let Some(action) = action else {
            return;
        };
        debug!(owner = self.owner.get(), ?action, "gesture");
        match action {
            GestureAction::Prev => {
                self.prev(doc);
            }
            GestureAction::Next => {
                self.next(doc);
            }
            GestureAction::Close => {
                self.close(doc);
            }
        }
    }
}

/// Remove the loader and the one-shot load/error listeners of a slide.
fn settle(doc: &mut Document, slide: &mut Slide) {
    doc.detach(slide.loader);
    if let Some(ids) = slide.pending.take() {
        for id in ids {
            doc.remove_listener(id);
        }
    }
}

// ============================================================================
// Build-once construction
// ============================================================================

fn decorate_trigger(doc: &mut Document, config: &LightboxConfig, trigger: NodeId) {
    doc.add_class(trigger, TRIGGER_CLASS);
    if config.zoom && doc.first_by_tag(trigger, "img").is_some() {
        let icon = doc.create_element("div");
        doc.add_class(icon, ZOOM_ICON_CLASS);
        doc.set_inner_html(icon, &config.zoom_text);
        doc.add_class(trigger, ZOOM_CLASS);
        doc.append_child(trigger, icon);
    }
}

fn build_overlay(doc: &mut Document) -> Overlay {
    let root = doc.create_element("div");
    doc.set_attribute(root, "role", "dialog");
    doc.set_attribute(root, "aria-hidden", "true");
    doc.add_class(root, OVERLAY_CLASS);
    doc.append_child(doc.body(), root);

    let slider = doc.create_element("div");
    doc.add_class(slider, SLIDER_CLASS);
    doc.append_child(root, slider);

    let mut button = |label: &str| {
        let node = doc.create_element("button");
        doc.set_attribute(node, "type", "button");
        doc.set_attribute(node, "aria-label", label);
        doc.append_child(root, node);
        node
    };
    let prev = button("Previous");
    let next = button("Next");
    let close = button("Close");

    let counter = doc.create_element("div");
    doc.add_class(counter, COUNTER_CLASS);
    doc.append_child(root, counter);

    Overlay {
        root,
        slider,
        prev,
        next,
        close,
        counter,
    }
}

fn caption_for(doc: &Document, config: &LightboxConfig, trigger: NodeId) -> Option<String> {
    if !config.captions {
        return None;
    }
    let source = match config.captions_selector {
        CaptionSource::Trigger => trigger,
        CaptionSource::Image => doc.first_by_tag(trigger, "img")?,
    };
    doc.attribute(source, &config.caption_attribute)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

fn build_slides(
    doc: &mut Document,
    config: &LightboxConfig,
    owner: OwnerId,
    items: &[GalleryItem],
    overlay: &Overlay,
) -> Vec<Slide> {
    let mut figure_ids = Vec::new();
    let mut caption_ids = Vec::new();
    let id = owner.get();

    let slides = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let root = doc.create_element("div");
            doc.add_class(root, SLIDE_CLASS);
            doc.set_attribute(root, "id", &format!("slb-slide-{id}-{i}"));

            let wrapper = doc.create_element("div");
            doc.add_class(wrapper, FIGURE_WRAPPER_CLASS);
            doc.set_attribute(wrapper, "id", &format!("slb-figure-wrapper-{id}-{i}"));

            let figure = doc.create_element("figure");
            let loader = doc.create_element("div");
            doc.add_class(loader, LOADER_CLASS);
            doc.append_child(figure, loader);

            let thumb = doc.first_by_tag(item.trigger, "img");
            let alt = thumb
                .and_then(|img| doc.attribute(img, "alt"))
                .unwrap_or_default()
                .to_owned();
            let href = doc
                .attribute(item.trigger, "href")
                .unwrap_or_default()
                .to_owned();

            let image = doc.create_element("img");
            doc.set_style(image, "opacity", "0");
            doc.set_attribute(image, "alt", &alt);
            doc.set_attribute(image, "src", "");
            doc.set_attribute(image, DEFERRED_SRC, &href);
            doc.append_child(figure, image);

            let caption = caption_for(doc, config, item.trigger).map(|text| {
                let n = figure_ids.len();
                let figure_id = format!("slb-figure-{id}-{n}");
                let caption_id = format!("slb-figcaption-{id}-{n}");
                let node = doc.create_element("figcaption");
                doc.set_style(node, "opacity", "0");
                doc.set_inner_html(node, &text);
                doc.set_attribute(figure, "id", &figure_id);
                doc.set_attribute(node, "id", &caption_id);
                doc.append_child(figure, node);
                figure_ids.push(figure_id);
                caption_ids.push(caption_id);
                node
            });

            doc.append_child(wrapper, figure);
            doc.append_child(root, wrapper);
            doc.append_child(overlay.slider, root);

            Slide {
                root,
                wrapper,
                figure,
                loader,
                image,
                caption,
                status: SlideStatus::Pending,
                pending: None,
            }
        })
        .collect();

    if !figure_ids.is_empty() {
        doc.set_attribute(overlay.root, "aria-labelledby", &figure_ids.join(" "));
        doc.set_attribute(overlay.root, "aria-describedby", &caption_ids.join(" "));
    }
    slides
}

/// Show or hide the controls. Returns whether prev/next are shown.
fn configure_controls(
    doc: &mut Document,
    config: &LightboxConfig,
    caps: Capabilities,
    len: usize,
    overlay: &Overlay,
) -> bool {
    let nav_shown =
        config.nav.is_enabled() && len > 1 && !(config.nav == NavMode::Auto && caps.touch);
    if nav_shown {
        doc.set_inner_html(overlay.prev, &config.nav_text[0]);
        doc.set_inner_html(overlay.next, &config.nav_text[1]);
    } else {
        doc.set_style(overlay.prev, "display", "none");
        doc.set_style(overlay.next, "display", "none");
    }

    if !config.counter || len == 1 {
        doc.set_style(overlay.counter, "display", "none");
    }

    if config.close {
        doc.set_inner_html(overlay.close, &config.close_text);
    } else {
        doc.set_style(overlay.close, "display", "none");
    }

    if config.draggable {
        doc.set_style(overlay.slider, "cursor", CURSOR_GRAB);
    }
    nav_shown
}

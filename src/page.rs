//! A document together with the lightboxes attached to it.
//!
//! [`Page`] is the host environment: it owns the [`Document`], lets any
//! number of independent lightboxes attach to it, and turns input events
//! into listener invocations. Dispatch follows DOM semantics:
//!
//! - deliveries come from [`Document::route`] (capture, target, bubble);
//! - a listener removed by an earlier handler in the same dispatch is skipped;
//! - a handler that stops propagation lets the remaining listeners on the
//!   same current target run, then ends the dispatch.

use crate::config::LightboxConfig;
use crate::dom::{Document, ListenerTarget, NodeId};
use crate::events::{Event, Key};
use crate::gesture::Point;
use crate::lightbox::{Lightbox, LightboxError};
use tracing::trace;

/// Handle to a lightbox attached to a [`Page`]. The default handle names
/// the first lightbox attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GalleryId(usize);

impl GalleryId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Result of dispatching one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Some handler prevented the default action.
    pub default_prevented: bool,
    /// Number of handlers that ran.
    pub delivered: usize,
    /// Propagation was stopped before the route was exhausted.
    pub stopped: bool,
}

#[derive(Debug)]
pub struct Page {
    doc: Document,
    galleries: Vec<Lightbox>,
}

impl Page {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            galleries: Vec::new(),
        }
    }

    /// Attach a new lightbox to the page.
    pub fn attach(&mut self, config: LightboxConfig) -> Result<GalleryId, LightboxError> {
        let lightbox = Lightbox::init(&mut self.doc, config)?;
        self.galleries.push(lightbox);
        Ok(GalleryId(self.galleries.len() - 1))
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }

    pub fn gallery(&self, id: GalleryId) -> Option<&Lightbox> {
        self.galleries.get(id.0)
    }

    pub fn galleries(&self) -> &[Lightbox] {
        &self.galleries
    }

    /// Borrow the document and one lightbox at the same time, for calling
    /// controller operations directly.
    pub fn split_mut(&mut self, id: GalleryId) -> Option<(&mut Document, &mut Lightbox)> {
        let lightbox = self.galleries.get_mut(id.0)?;
        Some((&mut self.doc, lightbox))
    }

    /// Deliver `event` to every listener on its propagation path.
    pub fn dispatch(&mut self, event: &Event) -> DispatchOutcome {
        let deliveries = self.doc.route(event.kind(), event.target());
        let mut outcome = DispatchOutcome::default();
        let mut stopped_at: Option<ListenerTarget> = None;

        for delivery in &deliveries {
            if let Some(at) = stopped_at {
                if delivery.current_target != at {
                    outcome.stopped = true;
                    break;
                }
            }
            if !self.doc.has_listener(delivery.listener) {
                continue;
            }
            let Some(lightbox) = self
                .galleries
                .iter_mut()
                .find(|g| g.owner() == delivery.owner)
            else {
                continue;
            };

            trace!(kind = ?event.kind(), handler = ?delivery.handler, "deliver");
            let result = lightbox.handle(&mut self.doc, delivery, event);
            outcome.delivered += 1;
            outcome.default_prevented |= result.prevent_default;
            if result.stop && stopped_at.is_none() {
                stopped_at = Some(delivery.current_target);
            }
        }
        outcome
    }

    // ------------------------------------------------------------------
    // Convenience input
    // ------------------------------------------------------------------

    pub fn click(&mut self, target: NodeId) -> DispatchOutcome {
        self.dispatch(&Event::Click { target })
    }

    /// Press `key` on the currently focused element.
    pub fn key(&mut self, key: Key) -> DispatchOutcome {
        let target = self.doc.active_element();
        self.dispatch(&Event::KeyDown { target, key })
    }

    /// Move focus to `target` and dispatch the focus event.
    pub fn focus(&mut self, target: NodeId) -> DispatchOutcome {
        self.doc.focus(target);
        self.dispatch(&Event::Focus { target })
    }

    pub fn image_loaded(&mut self, image: NodeId) -> DispatchOutcome {
        self.dispatch(&Event::Load { target: image })
    }

    pub fn image_failed(&mut self, image: NodeId) -> DispatchOutcome {
        self.dispatch(&Event::Error { target: image })
    }

    /// Touch start, move and end on `target`.
    pub fn swipe(&mut self, target: NodeId, from: Point, to: Point) {
        self.dispatch(&Event::TouchStart { target, point: from });
        self.dispatch(&Event::TouchMove { target, point: to });
        self.dispatch(&Event::TouchEnd { target });
    }

    /// Mouse down, move and up on `target`.
    pub fn drag(&mut self, target: NodeId, from: Point, to: Point) {
        self.dispatch(&Event::MouseDown { target, point: from });
        self.dispatch(&Event::MouseMove { target, point: to });
        self.dispatch(&Event::MouseUp { target, point: to });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::inner_html;
    use crate::test_helpers::*;

    fn open_page(n: usize) -> (Page, GalleryId) {
        let mut page = Page::new(gallery_document(n));
        let id = page.attach(LightboxConfig::default()).unwrap();
        (page, id)
    }

    fn trigger(page: &Page, id: GalleryId, i: usize) -> NodeId {
        page.gallery(id).unwrap().items()[i].trigger
    }

    #[test]
    fn trigger_click_opens_and_prevents_default() {
        let (mut page, id) = open_page(3);
        let t = trigger(&page, id, 1);
        let outcome = page.click(t);
        assert!(outcome.default_prevented);
        let lb = page.gallery(id).unwrap();
        assert!(lb.is_open(page.document()));
        assert_eq!(lb.current_index(), 1);
    }

    #[test]
    fn click_on_thumbnail_reaches_trigger() {
        let (mut page, id) = open_page(3);
        let t = trigger(&page, id, 2);
        let img = page.document().first_by_tag(t, "img").unwrap();
        page.click(img);
        assert_eq!(page.gallery(id).unwrap().current_index(), 2);
    }

    #[test]
    fn second_trigger_click_while_open_is_ignored() {
        let (mut page, id) = open_page(3);
        let first = trigger(&page, id, 0);
        let last = trigger(&page, id, 2);
        page.click(first);
        page.click(last);
        assert_eq!(page.gallery(id).unwrap().current_index(), 0);
    }

    #[test]
    fn buttons_navigate_and_close() {
        let (mut page, id) = open_page(3);
        page.click(trigger(&page, id, 0));
        let o = *page.gallery(id).unwrap().overlay();

        page.click(o.next);
        assert_eq!(page.gallery(id).unwrap().current_index(), 1);
        page.click(o.prev);
        assert_eq!(page.gallery(id).unwrap().current_index(), 0);
        assert_eq!(page.document().active_element(), o.prev);

        page.click(o.close);
        assert!(!page.gallery(id).unwrap().is_open(page.document()));
    }

    #[test]
    fn keyboard_navigation() {
        let (mut page, id) = open_page(3);
        page.click(trigger(&page, id, 0));
        page.key(Key::ArrowRight);
        page.key(Key::ArrowRight);
        page.key(Key::ArrowRight);
        let lb = page.gallery(id).unwrap();
        assert_eq!(lb.current_index(), 2);
        assert_eq!(inner_html(page.document(), lb.overlay().counter), "3/3");
        page.key(Key::ArrowLeft);
        assert_eq!(page.gallery(id).unwrap().current_index(), 1);
        page.key(Key::Escape);
        assert!(!page.gallery(id).unwrap().is_open(page.document()));
    }

    #[test]
    fn keyboard_ignored_when_disabled_or_closed() {
        let mut page = Page::new(gallery_document(3));
        let config = LightboxConfig {
            keyboard: false,
            ..LightboxConfig::default()
        };
        let id = page.attach(config).unwrap();
        page.key(Key::ArrowRight);
        assert!(!page.gallery(id).unwrap().is_open(page.document()));

        page.click(trigger(&page, id, 0));
        page.key(Key::ArrowRight);
        page.key(Key::Escape);
        let lb = page.gallery(id).unwrap();
        assert_eq!(lb.current_index(), 0);
        assert!(lb.is_open(page.document()));
    }

    #[test]
    fn doc_close_only_on_figure_wrapper() {
        let mut page = Page::new(gallery_document(2));
        let config = LightboxConfig {
            doc_close: true,
            ..LightboxConfig::default()
        };
        let id = page.attach(config).unwrap();
        page.click(trigger(&page, id, 0));
        let lb = page.gallery(id).unwrap();
        let image = lb.slides()[0].image;
        let wrapper = lb.slides()[0].wrapper;

        page.click(image);
        assert!(page.gallery(id).unwrap().is_open(page.document()));
        page.click(wrapper);
        assert!(!page.gallery(id).unwrap().is_open(page.document()));
    }

    #[test]
    fn backdrop_click_ignored_without_doc_close() {
        let (mut page, id) = open_page(2);
        page.click(trigger(&page, id, 0));
        let wrapper = page.gallery(id).unwrap().slides()[0].wrapper;
        page.click(wrapper);
        assert!(page.gallery(id).unwrap().is_open(page.document()));
    }

    #[test]
    fn touch_swipe_navigates() {
        let (mut page, id) = open_page(3);
        page.click(trigger(&page, id, 1));
        let image = page.gallery(id).unwrap().slides()[1].image;

        page.swipe(image, Point::new(200.0, 100.0), Point::new(150.0, 100.0));
        assert_eq!(page.gallery(id).unwrap().current_index(), 2);
        page.swipe(image, Point::new(100.0, 100.0), Point::new(190.0, 100.0));
        assert_eq!(page.gallery(id).unwrap().current_index(), 1);
        page.swipe(image, Point::new(100.0, 100.0), Point::new(110.0, 100.0));
        assert_eq!(page.gallery(id).unwrap().current_index(), 1);
    }

    #[test]
    fn touch_events_stop_propagation() {
        let (mut page, id) = open_page(2);
        page.click(trigger(&page, id, 0));
        let image = page.gallery(id).unwrap().slides()[0].image;
        let outcome = page.dispatch(&Event::TouchStart {
            target: image,
            point: Point::new(0.0, 0.0),
        });
        assert_eq!(outcome.delivered, 1);
        assert!(!outcome.default_prevented);
    }

    #[test]
    fn swipe_down_closes() {
        let (mut page, id) = open_page(3);
        page.click(trigger(&page, id, 1));
        let image = page.gallery(id).unwrap().slides()[1].image;
        page.swipe(image, Point::new(100.0, 100.0), Point::new(100.0, 160.0));
        assert!(!page.gallery(id).unwrap().is_open(page.document()));
    }

    #[test]
    fn mouse_drag_updates_cursor_and_navigates() {
        let (mut page, id) = open_page(3);
        page.click(trigger(&page, id, 0));
        let lb = page.gallery(id).unwrap();
        let slider = lb.overlay().slider;
        let image = lb.slides()[0].image;

        let down = page.dispatch(&Event::MouseDown {
            target: image,
            point: Point::new(300.0, 10.0),
        });
        assert!(down.default_prevented);
        page.dispatch(&Event::MouseMove {
            target: image,
            point: Point::new(200.0, 10.0),
        });
        assert_eq!(page.document().style(slider, "cursor"), Some("grabbing"));
        page.dispatch(&Event::MouseUp {
            target: image,
            point: Point::new(200.0, 10.0),
        });
        assert_eq!(page.document().style(slider, "cursor"), Some("grab"));
        assert_eq!(page.gallery(id).unwrap().current_index(), 1);
    }

    #[test]
    fn mouse_leave_mid_drag_evaluates() {
        let (mut page, id) = open_page(3);
        page.click(trigger(&page, id, 1));
        let lb = page.gallery(id).unwrap();
        let root = lb.overlay().root;
        let image = lb.slides()[1].image;

        page.dispatch(&Event::MouseDown {
            target: image,
            point: Point::new(100.0, 0.0),
        });
        page.dispatch(&Event::MouseLeave {
            target: root,
            point: Point::new(180.0, 0.0),
        });
        let lb = page.gallery(id).unwrap();
        assert_eq!(lb.current_index(), 0);
        assert!(!lb.is_dragging());
    }

    #[test]
    fn drag_cut_short_by_close_does_not_survive_reopen() {
        let (mut page, id) = open_page(3);
        page.click(trigger(&page, id, 0));
        let image = page.gallery(id).unwrap().slides()[0].image;
        page.dispatch(&Event::MouseDown {
            target: image,
            point: Point::new(300.0, 0.0),
        });
        assert!(page.gallery(id).unwrap().is_dragging());
        page.key(Key::Escape);

        page.click(trigger(&page, id, 2));
        let lb = page.gallery(id).unwrap();
        assert_eq!(lb.current_index(), 2);
        assert!(!lb.is_dragging());
        let overlay = *lb.overlay();

        page.dispatch(&Event::MouseMove {
            target: overlay.root,
            point: Point::new(450.0, 0.0),
        });
        assert_eq!(page.document().style(overlay.slider, "cursor"), Some("grab"));
        page.dispatch(&Event::MouseLeave {
            target: overlay.root,
            point: Point::new(500.0, 0.0),
        });
        assert_eq!(page.gallery(id).unwrap().current_index(), 2);
    }

    #[test]
    fn dragging_disabled_ignores_pointer() {
        let mut page = Page::new(gallery_document(3));
        let config = LightboxConfig {
            draggable: false,
            ..LightboxConfig::default()
        };
        let id = page.attach(config).unwrap();
        page.click(trigger(&page, id, 0));
        let image = page.gallery(id).unwrap().slides()[0].image;
        page.swipe(image, Point::new(200.0, 0.0), Point::new(0.0, 0.0));
        page.drag(image, Point::new(200.0, 0.0), Point::new(0.0, 0.0));
        assert_eq!(page.gallery(id).unwrap().current_index(), 0);
    }

    #[test]
    fn focus_trap_redirects_outside_focus() {
        let (mut page, id) = open_page(3);
        let first = trigger(&page, id, 0);
        page.click(first);
        let next = page.gallery(id).unwrap().overlay().next;

        let outcome = page.focus(trigger(&page, id, 2));
        assert_eq!(outcome.delivered, 1);
        assert_eq!(page.document().active_element(), next);
    }

    #[test]
    fn focus_inside_overlay_is_left_alone() {
        let (mut page, id) = open_page(3);
        page.click(trigger(&page, id, 1));
        let close = page.gallery(id).unwrap().overlay().close;
        page.focus(close);
        assert_eq!(page.document().active_element(), close);
    }

    #[test]
    fn focus_trap_inactive_when_closed() {
        let (mut page, id) = open_page(3);
        let t = trigger(&page, id, 2);
        let outcome = page.focus(t);
        assert_eq!(outcome.delivered, 0);
        assert_eq!(page.document().active_element(), t);
    }

    #[test]
    fn image_events_route_to_slide() {
        let (mut page, id) = open_page(3);
        page.click(trigger(&page, id, 0));
        let slides = page.gallery(id).unwrap().slides().to_vec();

        page.image_loaded(slides[0].image);
        page.image_failed(slides[1].image);
        let doc = page.document();
        assert_eq!(doc.style(slides[0].image, "opacity"), Some("1"));
        assert!(doc.has_class(slides[1].figure, crate::lightbox::ERROR_CLASS));

        // One-shot: a second load event finds no listener.
        assert_eq!(page.image_loaded(slides[0].image).delivered, 0);
    }

    #[test]
    fn deliveries_reach_only_their_owner() {
        let mut page = Page::new(two_gallery_document(3, 2));
        let a = page
            .attach(LightboxConfig {
                selector: ".gallery-a".into(),
                ..LightboxConfig::default()
            })
            .unwrap();
        let b = page
            .attach(LightboxConfig {
                selector: ".gallery-b".into(),
                ..LightboxConfig::default()
            })
            .unwrap();
        assert_ne!(a, b);

        page.click(trigger(&page, b, 1));
        let outcome = page.key(Key::ArrowLeft);
        assert_eq!(outcome.delivered, 1);
        assert_eq!(page.gallery(b).unwrap().current_index(), 0);
        assert!(!page.gallery(a).unwrap().is_open(page.document()));
    }

    #[test]
    fn split_mut_drives_controller_directly() {
        let (mut page, id) = open_page(4);
        let (doc, lb) = page.split_mut(id).unwrap();
        lb.open(doc, 3);
        assert!(!lb.next(doc));
        assert!(page.split_mut(GalleryId(7)).is_none());
    }
}

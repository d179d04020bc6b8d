//! HTML serialization of a [`Document`].
//!
//! Uses [maud](https://maud.lambda.xyz/) for the page shell and maud's
//! [`Render`] trait for the node tree: [`NodeView`] writes an element and its
//! subtree straight into the output buffer. Attribute values and tag-less
//! text go through maud's escaping; raw markup fragments (button labels,
//! captions, counter text) are emitted verbatim, the same as an `innerHTML`
//! assignment would show them.
//!
//! Attributes are written in name order so the output is deterministic and
//! can be compared in tests.

use crate::dom::{Content, Document, NodeId};
use maud::{DOCTYPE, Markup, PreEscaped, Render, html};

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// A node and its subtree, renderable with maud.
#[derive(Clone, Copy)]
pub struct NodeView<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> NodeView<'a> {
    pub fn new(doc: &'a Document, id: NodeId) -> Self {
        Self { doc, id }
    }
}

impl Render for NodeView<'_> {
    fn render_to(&self, buffer: &mut String) {
        let element = match self.doc.content(self.id) {
            Content::Markup(markup) => {
                buffer.push_str(markup);
                return;
            }
            Content::Element(element) => element,
        };

        buffer.push('<');
        buffer.push_str(element.tag());
        for (name, value) in element.attributes() {
            buffer.push(' ');
            buffer.push_str(&name);
            buffer.push_str("=\"");
            value.as_str().render_to(buffer);
            buffer.push('"');
        }
        buffer.push('>');

        if VOID_ELEMENTS.contains(&element.tag()) {
            return;
        }
        for &child in self.doc.children(self.id) {
            NodeView::new(self.doc, child).render_to(buffer);
        }
        buffer.push_str("</");
        buffer.push_str(element.tag());
        buffer.push('>');
    }
}

/// Serialized subtree of `id`, the node itself included.
pub fn outer_html(doc: &Document, id: NodeId) -> String {
    NodeView::new(doc, id).render().into_string()
}

/// Serialized children of `id`.
pub fn inner_html(doc: &Document, id: NodeId) -> String {
    let mut buffer = String::new();
    for &child in doc.children(id) {
        NodeView::new(doc, child).render_to(&mut buffer);
    }
    buffer
}

/// Render the whole document as a standalone HTML page.
///
/// The document's own `<head>` children are kept after the generated
/// charset, viewport, title and stylesheet tags.
pub fn render_page(doc: &Document, title: &str, css: &str) -> Markup {
    let body_class = doc.attribute(doc.body(), "class").filter(|c| !c.is_empty());
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                @if !css.is_empty() {
                    style { (PreEscaped(css)) }
                }
                @for &child in doc.children(doc.head()) {
                    (NodeView::new(doc, child))
                }
            }
            body class=[body_class] {
                @for &child in doc.children(doc.body()) {
                    (NodeView::new(doc, child))
                }
            }
        }
    }
}

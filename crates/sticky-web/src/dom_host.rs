//! `web-sys` implementation of [`LayoutHost`].

use sticky_core::{LayoutHost, OffsetBox, ReadyState, StyleProperty, Viewport};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, Window};

use crate::error::HostError;

/// Layout queries and style writes against the live document.
#[derive(Debug, Clone)]
pub struct DomHost {
    window: Window,
    document: Document,
    root: Element,
}

impl DomHost {
    /// Bind to the global window and its document.
    pub fn from_global() -> Result<Self, HostError> {
        let window = web_sys::window().ok_or(HostError::NoWindow)?;
        let document = window.document().ok_or(HostError::NoDocument)?;
        let root = document
            .document_element()
            .ok_or(HostError::NoRootElement)?;
        Ok(Self {
            window,
            document,
            root,
        })
    }

    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl LayoutHost for DomHost {
    type Node = Element;

    fn query_all(&self, selector: &str) -> Vec<Element> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(err) => {
                let err = HostError::from_js_value("querySelectorAll", &err);
                tracing::warn!(selector, %err, "selector rejected");
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn ready_state(&self) -> ReadyState {
        ReadyState::from_dom(&self.document.ready_state())
    }

    fn viewport(&self) -> Viewport {
        let inner = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
            value.ok().and_then(|v| v.as_f64())
        };
        Viewport::from_client_and_inner(
            f64::from(self.root.client_width()),
            f64::from(self.root.client_height()),
            inner(self.window.inner_width()),
            inner(self.window.inner_height()),
        )
    }

    fn scroll_offset(&self) -> f64 {
        let scroll = self.window.scroll_y().unwrap_or(0.0);
        scroll - f64::from(self.root.client_top())
    }

    fn document_root(&self) -> Element {
        self.root.clone()
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn offset_parent(&self, node: &Element) -> Option<Element> {
        node.dyn_ref::<HtmlElement>()
            .and_then(HtmlElement::offset_parent)
    }

    fn offset_box(&self, node: &Element) -> OffsetBox {
        let Some(html) = node.dyn_ref::<HtmlElement>() else {
            return OffsetBox::default();
        };
        OffsetBox {
            top: f64::from(html.offset_top()),
            left: f64::from(html.offset_left()),
            width: f64::from(html.offset_width()),
            height: f64::from(html.offset_height()),
        }
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn has_attribute(&self, node: &Element, name: &str) -> bool {
        node.has_attribute(name)
    }

    fn is_image(&self, node: &Element) -> bool {
        node.is_instance_of::<HtmlImageElement>()
    }

    fn is_connected(&self, node: &Element) -> bool {
        node.is_connected()
    }

    fn set_style(&self, node: &Element, property: StyleProperty, value: &str) {
        let Some(html) = node.dyn_ref::<HtmlElement>() else {
            return;
        };
        if let Err(err) = html.style().set_property(property.css_name(), value) {
            let err = HostError::from_js_value("style.setProperty", &err);
            tracing::warn!(property = property.css_name(), value, %err, "style write rejected");
        }
    }

    fn clear_style(&self, node: &Element, property: StyleProperty) {
        let Some(html) = node.dyn_ref::<HtmlElement>() else {
            return;
        };
        if let Err(err) = html.style().remove_property(property.css_name()) {
            let err = HostError::from_js_value("style.removeProperty", &err);
            tracing::warn!(property = property.css_name(), %err, "style clear rejected");
        }
    }
}

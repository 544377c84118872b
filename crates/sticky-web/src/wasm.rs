//! `wasm-bindgen` export and DOM event wiring.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use sticky_core::{StickyController, StickyEvent, StickyId};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Document, EventTarget, Window};

use crate::dispatch::{dispatch, ready, update};
use crate::dom_host::DomHost;
use crate::error::HostError;

type SharedController = Rc<RefCell<StickyController<DomHost>>>;
type SharedListeners = Rc<RefCell<Vec<Listener>>>;

/// A registered DOM listener. Dropping it unregisters the callback.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut()>,
}

impl Listener {
    fn register(
        target: EventTarget,
        kind: &'static str,
        callback: Closure<dyn FnMut()>,
    ) -> Option<Self> {
        Self::register_with(target, kind, callback, None)
    }

    fn register_with(
        target: EventTarget,
        kind: &'static str,
        callback: Closure<dyn FnMut()>,
        options: Option<&AddEventListenerOptions>,
    ) -> Option<Self> {
        let function = callback.as_ref().unchecked_ref();
        let registered = match options {
            Some(options) => target
                .add_event_listener_with_callback_and_add_event_listener_options(
                    kind, function, options,
                ),
            None => target.add_event_listener_with_callback(kind, function),
        };
        match registered {
            Ok(()) => Some(Self {
                target,
                kind,
                callback,
            }),
            Err(err) => {
                let err = HostError::from_js_value("addEventListener", &err);
                warn!(kind, %err, "listener registration failed");
                None
            }
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// Keeps matched elements pinned inside their container while the page
/// scrolls.
#[wasm_bindgen(js_name = Sticky)]
pub struct Sticky {
    controller: Option<SharedController>,
    listeners: SharedListeners,
}

#[wasm_bindgen(js_class = Sticky)]
impl Sticky {
    /// Manage every element matching `selector`. Elements are activated as
    /// soon as the document is interactive.
    #[wasm_bindgen(constructor)]
    pub fn new(selector: &str) -> Sticky {
        let listeners: SharedListeners = Rc::new(RefCell::new(Vec::new()));

        let host = match DomHost::from_global() {
            Ok(host) => host,
            Err(err) => {
                warn!(selector, %err, "sticky disabled");
                return Sticky {
                    controller: None,
                    listeners,
                };
            }
        };
        let window = host.window().clone();
        let document = host.document().clone();

        let controller: SharedController =
            Rc::new(RefCell::new(StickyController::new(host, selector)));

        let ids = controller.borrow_mut().activate();
        if controller.borrow().is_active() {
            wire_elements(&controller, &window, &listeners, &ids);
        } else {
            debug!(selector, "waiting for document readiness");
            wait_for_ready(&controller, &window, &document, &listeners);
        }

        Sticky {
            controller: Some(controller),
            listeners,
        }
    }

    /// Re-measure and re-position every managed element. Call after layout
    /// changes the page cannot signal through scroll or resize.
    pub fn update(&self) {
        if let Some(controller) = &self.controller {
            update(controller);
        }
    }
}

impl Sticky {
    /// Number of DOM listeners currently owned by this object.
    #[doc(hidden)]
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl Drop for Sticky {
    fn drop(&mut self) {
        let count = self.listeners.borrow().len();
        self.listeners.borrow_mut().clear();
        debug!(listeners = count, "sticky released");
    }
}

/// Activate on the next `readystatechange`. The listener is registered with
/// `once`; the first transition out of `loading` is always to a ready state.
fn wait_for_ready(
    controller: &SharedController,
    window: &Window,
    document: &Document,
    listeners: &SharedListeners,
) {
    let controller_for_cb = Rc::clone(controller);
    let window_for_cb = window.clone();
    let listeners_for_cb: Weak<RefCell<Vec<Listener>>> = Rc::downgrade(listeners);

    let callback = Closure::<dyn FnMut()>::new(move || {
        let ids = ready(&controller_for_cb);
        if ids.is_empty() {
            return;
        }
        if let Some(listeners) = listeners_for_cb.upgrade() {
            wire_elements(&controller_for_cb, &window_for_cb, &listeners, &ids);
        }
    });

    let options = AddEventListenerOptions::new();
    options.set_once(true);
    if let Some(listener) = Listener::register_with(
        document.clone().into(),
        "readystatechange",
        callback,
        Some(&options),
    ) {
        listeners.borrow_mut().push(listener);
    }
}

/// Register one resize and one scroll listener per element, plus a load
/// listener for images.
fn wire_elements(
    controller: &SharedController,
    window: &Window,
    listeners: &SharedListeners,
    ids: &[StickyId],
) {
    let mut registered = Vec::with_capacity(ids.len() * 2);
    for &id in ids {
        let (node, image) = {
            let controller = controller.borrow();
            let Some(node) = controller.node(id).cloned() else {
                continue;
            };
            let image = controller.state(id).is_some_and(|s| s.image);
            (node, image)
        };

        for (kind, event) in [("resize", StickyEvent::Resize), ("scroll", StickyEvent::Scroll)] {
            let callback = dispatcher(controller, id, event);
            registered.extend(Listener::register(window.clone().into(), kind, callback));
        }
        if image {
            let callback = dispatcher(controller, id, StickyEvent::ImageLoaded);
            registered.extend(Listener::register(node.into(), "load", callback));
        }
    }

    debug!(elements = ids.len(), listeners = registered.len(), "sticky listeners wired");
    listeners.borrow_mut().extend(registered);
}

fn dispatcher(controller: &SharedController, id: StickyId, event: StickyEvent) -> Closure<dyn FnMut()> {
    let controller = Rc::clone(controller);
    Closure::<dyn FnMut()>::new(move || {
        dispatch(&controller, id, event);
    })
}

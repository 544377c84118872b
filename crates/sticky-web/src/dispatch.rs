//! Routing of DOM callbacks into a shared controller.
//!
//! Callbacks hold the controller behind a `RefCell`. A callback that fires
//! while the controller is already borrowed (a style write that synchronously
//! triggers another event) is dropped instead of panicking.

use std::cell::RefCell;

use sticky_core::{LayoutHost, Placement, StickyController, StickyEvent, StickyId};

/// Forward `event` for `id`, or skip it if the controller is busy.
pub fn dispatch<H: LayoutHost>(
    controller: &RefCell<StickyController<H>>,
    id: StickyId,
    event: StickyEvent,
) -> Option<Placement> {
    match controller.try_borrow_mut() {
        Ok(mut controller) => controller.handle_event(id, event),
        Err(_) => {
            tracing::trace!(id = id.index(), ?event, "event skipped: controller busy");
            None
        }
    }
}

/// Run `update()`, or skip it if the controller is busy. Returns whether it
/// ran.
pub fn update<H: LayoutHost>(controller: &RefCell<StickyController<H>>) -> bool {
    match controller.try_borrow_mut() {
        Ok(mut controller) => {
            controller.update();
            true
        }
        Err(_) => {
            tracing::trace!("update skipped: controller busy");
            false
        }
    }
}

/// Feed the host's current ready state. Returns newly activated ids, or
/// nothing if the controller is busy or was already active.
pub fn ready<H: LayoutHost>(controller: &RefCell<StickyController<H>>) -> Vec<StickyId> {
    match controller.try_borrow_mut() {
        Ok(mut controller) => {
            let state = controller.host().ready_state();
            controller.on_ready_state(state)
        }
        Err(_) => {
            tracing::trace!("readystatechange skipped: controller busy");
            Vec::new()
        }
    }
}

#![forbid(unsafe_code)]

//! Browser binding for the sticky controller.
//!
//! Exposes a `Sticky` class to JavaScript:
//!
//! ```js
//! import init, { Sticky } from "./sticky_web.js";
//! await init();
//! const sticky = new Sticky(".sidebar");
//! // after inserting content the controller cannot see:
//! sticky.update();
//! ```
//!
//! Build with `wasm-pack build --target bundler` (or `web`) for an importable
//! module, or `--target no-modules` for a plain script that exposes the class
//! on the `wasm_bindgen` global.
//!
//! Elements opt in to a top margin with `data-margin-top="<px>"` and a
//! bounding ancestor is marked with `data-sticky-container`.
//!
//! Listeners registered by a `Sticky` live as long as the object; calling
//! `free()` on it removes them. The `readystatechange` listener used to
//! delay activation fires at most once.

pub mod dispatch;
pub mod error;

#[cfg(target_arch = "wasm32")]
pub mod dom_host;

#[cfg(target_arch = "wasm32")]
mod wasm;

pub use error::HostError;

#[cfg(target_arch = "wasm32")]
pub use dom_host::DomHost;

#[cfg(target_arch = "wasm32")]
pub use wasm::Sticky;

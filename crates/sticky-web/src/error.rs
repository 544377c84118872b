//! Failures talking to the browser.
//!
//! None of these reach JavaScript. They are logged and the binding degrades:
//! a missing window or document leaves the `Sticky` inert, a rejected style
//! write or listener registration is skipped.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("no global window")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    #[error("document has no root element")]
    NoRootElement,

    #[error("{context}: {message}")]
    Js {
        context: &'static str,
        message: String,
    },
}

impl HostError {
    #[must_use]
    pub fn js(context: &'static str, message: impl Into<String>) -> Self {
        Self::Js {
            context,
            message: message.into(),
        }
    }

    /// Wrap a thrown JS value.
    #[cfg(target_arch = "wasm32")]
    #[must_use]
    pub fn from_js_value(context: &'static str, value: &wasm_bindgen::JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(value, &wasm_bindgen::JsValue::from_str("message"))
                    .ok()
                    .and_then(|m| m.as_string())
            })
            .unwrap_or_else(|| format!("{value:?}"));
        Self::js(context, message)
    }
}

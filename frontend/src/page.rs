use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::config::SiteConfig;
use crate::dom;
use crate::error::SiteError;

/// Swaps the `no-js` marker for `js-ready` and patches in
/// `scroll-padding-top` where the browser lacks it.
pub fn mark_ready(doc: &Document, config: &SiteConfig) -> Result<(), SiteError> {
    if let Some(root) = doc.document_element() {
        root.class_list().remove_1("no-js")?;
        let supported = web_sys::css::supports_with_value(
            "scroll-padding-top",
            config.scroll_padding_fallback,
        )
        .unwrap_or(true);
        if !supported {
            if let Some(root) = root.dyn_ref::<HtmlElement>() {
                dom::set_style(root, "scroll-padding-top", config.scroll_padding_fallback);
            }
        }
    }
    if let Some(body) = doc.body() {
        body.class_list().add_1("js-ready")?;
    }
    Ok(())
}

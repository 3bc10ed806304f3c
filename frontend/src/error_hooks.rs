//! Window-level hooks that surface failures and connectivity changes
//! through the toast. Nothing here may itself throw.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Event, Window};

use crate::dom;
use crate::error::SiteError;
use crate::toast::Toast;

pub const SCRIPT_ERROR_MESSAGE: &str =
    "Something went wrong. Please refresh the page or try again later.";
pub const REJECTION_MESSAGE: &str = "Something went wrong. Please try again.";
pub const OFFLINE_MESSAGE: &str =
    "You are offline. Some features may not work until you reconnect.";

fn show_quietly(toast: &Toast, message: &str) {
    if let Err(e) = toast.show(message) {
        log::debug!("toast unavailable: {}", e);
    }
}

pub fn install(window: &Window, toast: &Toast) -> Result<(), SiteError> {
    let on_error = {
        let toast = toast.clone();
        // Returning false leaves the browser's own error reporting in place.
        Closure::<dyn FnMut() -> bool>::new(move || {
            show_quietly(&toast, SCRIPT_ERROR_MESSAGE);
            false
        })
    };
    window.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    on_error.forget();

    {
        let toast = toast.clone();
        dom::listen(window, "unhandledrejection", move |event: Event| {
            show_quietly(&toast, REJECTION_MESSAGE);
            event.prevent_default();
        })?;
    }

    {
        let toast = toast.clone();
        dom::listen(window, "online", move |_: Event| {
            if let Err(e) = toast.hide_if_mentions("offline") {
                log::debug!("toast unavailable: {}", e);
            }
        })?;
    }

    {
        let toast = toast.clone();
        dom::listen(window, "offline", move |_: Event| {
            log::info!("connection lost");
            show_quietly(&toast, OFFLINE_MESSAGE);
        })?;
    }

    log::debug!("global error hooks installed");
    Ok(())
}

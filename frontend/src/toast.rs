//! Transient notification shown in `#global-error-toast`.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use web_sys::HtmlElement;

use crate::dom;
use crate::error::SiteError;

pub const TOAST_ID: &str = "global-error-toast";

/// What the toast shows. Every show bumps the generation, so an auto-hide
/// scheduled for an earlier message is recognised as stale.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ToastState {
    message: String,
    visible: bool,
    generation: u64,
}

impl ToastState {
    /// Returns the generation the auto-hide timer must present to `expire`.
    pub fn show(&mut self, message: &str) -> u64 {
        self.message = message.to_string();
        self.visible = true;
        self.generation += 1;
        self.generation
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Timer fired for `generation`. Hides and returns `true` only when no
    /// newer message has replaced the one the timer belongs to.
    pub fn expire(&mut self, generation: u64) -> bool {
        if !self.visible || generation != self.generation {
            return false;
        }
        self.hide();
        true
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Case-insensitive match against the message currently on screen.
    pub fn mentions(&self, needle: &str) -> bool {
        self.visible
            && !self.message.is_empty()
            && self.message.to_lowercase().contains(&needle.to_lowercase())
    }
}

struct Inner {
    element: Option<HtmlElement>,
    state: ToastState,
    timer: Option<Timeout>,
}

/// Cloning shares the same toast.
#[derive(Clone)]
pub struct Toast {
    inner: Rc<RefCell<Inner>>,
    show_ms: u32,
}

impl Toast {
    pub fn new(element: Option<HtmlElement>, show_ms: u32) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                element,
                state: ToastState::default(),
                timer: None,
            })),
            show_ms,
        }
    }

    /// The element may not be parsed yet when the error hooks go in, so
    /// lookups are retried on each render until it shows up.
    pub fn attach(show_ms: u32) -> Self {
        let element = dom::document()
            .ok()
            .and_then(|doc| dom::by_id::<HtmlElement>(&doc, TOAST_ID));
        Self::new(element, show_ms)
    }

    fn element(&self) -> Option<HtmlElement> {
        let mut inner = self.inner.borrow_mut();
        if inner.element.is_none() {
            inner.element = dom::document()
                .ok()
                .and_then(|doc| dom::by_id::<HtmlElement>(&doc, TOAST_ID));
        }
        inner.element.clone()
    }

    /// Writes the current state to the element.
    fn render(&self) -> Result<(), SiteError> {
        let Some(el) = self.element() else {
            return Ok(());
        };
        let state = self.inner.borrow().state.clone();
        if state.is_visible() {
            el.set_text_content(Some(state.message()));
            el.set_attribute("hidden", "false")?;
            el.class_list().add_1("visible")?;
        } else {
            el.class_list().remove_1("visible")?;
            el.set_attribute("hidden", "")?;
        }
        Ok(())
    }

    /// Replaces any current message and restarts the auto-hide timer.
    pub fn show(&self, message: &str) -> Result<(), SiteError> {
        let generation = self.inner.borrow_mut().state.show(message);

        let handle = self.clone();
        let timer = Timeout::new(self.show_ms, move || {
            if let Err(e) = handle.expire(generation) {
                log::debug!("toast auto-hide failed: {}", e);
            }
        });
        // Dropping the previous Timeout cancels it.
        self.inner.borrow_mut().timer = Some(timer);

        self.render()
    }

    fn expire(&self, generation: u64) -> Result<(), SiteError> {
        let expired = self.inner.borrow_mut().state.expire(generation);
        if expired {
            self.render()?;
        }
        Ok(())
    }

    pub fn hide(&self) -> Result<(), SiteError> {
        {
            let mut inner = self.inner.borrow_mut();
            inner.state.hide();
            if let Some(timer) = inner.timer.take() {
                timer.cancel();
            }
        }
        self.render()
    }

    pub fn hide_if_mentions(&self, needle: &str) -> Result<(), SiteError> {
        let mentioned = self.inner.borrow().state.mentions(needle);
        if mentioned {
            self.hide()?;
        }
        Ok(())
    }
}

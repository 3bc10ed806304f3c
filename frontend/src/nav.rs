use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Document, Element, Event, HtmlElement, Window};

use crate::config::SiteConfig;
use crate::dom;
use crate::error::SiteError;

/// Open/closed state of the mobile menu.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MenuState {
    open: bool,
}

impl MenuState {
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn aria_expanded(&self) -> &'static str {
        if self.open {
            "true"
        } else {
            "false"
        }
    }

    /// Body overflow while the menu is in this state.
    pub fn body_overflow(&self) -> &'static str {
        if self.open {
            "hidden"
        } else {
            ""
        }
    }
}

pub fn is_scrolled(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

#[derive(Clone)]
struct MobileMenu {
    toggle: Option<Element>,
    links: Option<Element>,
    body: Option<HtmlElement>,
}

impl MobileMenu {
    fn render(&self, state: MenuState) {
        let open = state.is_open();
        if let Some(links) = &self.links {
            let _ = links.class_list().toggle_with_force("active", open);
        }
        if let Some(toggle) = &self.toggle {
            let _ = toggle.class_list().toggle_with_force("active", open);
            let _ = toggle.set_attribute("aria-expanded", state.aria_expanded());
        }
        if let Some(body) = &self.body {
            dom::set_style(body, "overflow", state.body_overflow());
        }
    }
}

pub fn init_menu(doc: &Document) -> Result<(), SiteError> {
    let menu = MobileMenu {
        toggle: dom::query::<Element>(doc, ".nav-toggle"),
        links: dom::query::<Element>(doc, ".nav-links"),
        body: doc.body(),
    };
    let state = Rc::new(Cell::new(MenuState::default()));

    if let Some(toggle) = menu.toggle.clone() {
        let menu = menu.clone();
        let state = state.clone();
        dom::listen(&toggle, "click", move |_: Event| {
            let mut next = state.get();
            next.toggle();
            state.set(next);
            menu.render(next);
        })?;
    }

    if let Some(links) = menu.links.clone() {
        for link in dom::query_all_in::<Element>(&links, "a") {
            let menu = menu.clone();
            let state = state.clone();
            dom::listen(&link, "click", move |_: Event| {
                let mut next = state.get();
                next.close();
                state.set(next);
                menu.render(next);
            })?;
        }
    }
    Ok(())
}

pub fn init_header(window: &Window, doc: &Document, config: &SiteConfig) -> Result<(), SiteError> {
    let Some(header) = dom::query::<Element>(doc, ".header") else {
        return Ok(());
    };
    let threshold = config.scroll_threshold;
    let update = {
        let window = window.clone();
        move || {
            let y = window.scroll_y().unwrap_or(0.0);
            let _ = header
                .class_list()
                .toggle_with_force("scrolled", is_scrolled(y, threshold));
        }
    };
    update();

    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    let callback = Closure::<dyn FnMut()>::new(update);
    window.add_event_listener_with_callback_and_add_event_listener_options(
        "scroll",
        callback.as_ref().unchecked_ref(),
        &options,
    )?;
    callback.forget();
    Ok(())
}

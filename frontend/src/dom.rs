//! Thin helpers over `web_sys` shared by the page controllers.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, Window};

use crate::error::SiteError;

pub fn window() -> Result<Window, SiteError> {
    web_sys::window().ok_or(SiteError::NoWindow)
}

pub fn document() -> Result<Document, SiteError> {
    window()?.document().ok_or(SiteError::NoDocument)
}

/// First element matching `selector`, cast to `T`. `None` when absent or of
/// another element type.
pub fn query<T: JsCast>(root: &Document, selector: &str) -> Option<T> {
    root.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<T>().ok())
}

pub fn query_all<T: JsCast>(root: &Document, selector: &str) -> Vec<T> {
    match root.query_selector_all(selector) {
        Ok(list) => collect_nodes(&list),
        Err(_) => Vec::new(),
    }
}

pub fn query_all_in<T: JsCast>(root: &Element, selector: &str) -> Vec<T> {
    match root.query_selector_all(selector) {
        Ok(list) => collect_nodes(&list),
        Err(_) => Vec::new(),
    }
}

fn collect_nodes<T: JsCast>(list: &web_sys::NodeList) -> Vec<T> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

pub fn by_id<T: JsCast>(doc: &Document, id: &str) -> Option<T> {
    doc.get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
}

/// Attaches a listener for the lifetime of the page.
pub fn listen<E, F>(target: &EventTarget, event: &str, handler: F) -> Result<(), SiteError>
where
    E: JsCast + 'static,
    F: FnMut(E) + 'static,
{
    let mut handler = handler;
    let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        if let Ok(event) = event.dyn_into::<E>() {
            handler(event);
        }
    });
    target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}

pub fn set_style(el: &HtmlElement, property: &str, value: &str) {
    let style = el.style();
    let result = if value.is_empty() {
        style.remove_property(property).map(|_| ())
    } else {
        style.set_property(property, value)
    };
    if let Err(e) = result {
        log::debug!("failed to set {}: {:?}", property, e);
    }
}

/// Runs `frame` on every animation frame until it returns `false`.
pub fn animation_loop<F>(frame: F) -> Result<(), SiteError>
where
    F: FnMut(f64) -> bool + 'static,
{
    let win = window()?;
    let mut frame = frame;
    let slot: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let next = slot.clone();
    let win_inner = win.clone();

    *slot.borrow_mut() = Some(Closure::new(move |now: f64| {
        if !frame(now) {
            // Dropping the closure ends the loop.
            next.borrow_mut().take();
            return;
        }
        if let Some(cb) = next.borrow().as_ref() {
            if let Err(e) = win_inner.request_animation_frame(cb.as_ref().unchecked_ref()) {
                log::debug!("requestAnimationFrame failed: {:?}", e);
            }
        }
    }));

    let borrowed = slot.borrow();
    if let Some(cb) = borrowed.as_ref() {
        win.request_animation_frame(cb.as_ref().unchecked_ref())?;
    }
    Ok(())
}


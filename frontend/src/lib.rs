pub mod booking;
pub mod config;
pub mod counter;
pub mod dom;
pub mod error;
pub mod error_hooks;
pub mod motion;
pub mod nav;
pub mod page;
pub mod reveal;
pub mod tilt;
pub mod toast;

use log::{info, warn};
use web_sys::{Document, Event};

use config::SiteConfig;
use error::SiteError;
use toast::Toast;

/// Installs the error hooks right away and wires the page once the
/// document has been parsed.
pub fn start() {
    let config = SiteConfig::default();
    let window = match dom::window() {
        Ok(window) => window,
        Err(e) => {
            warn!("not running in a browser: {}", e);
            return;
        }
    };

    let toast = Toast::attach(config.toast_show_ms);
    if let Err(e) = error_hooks::install(&window, &toast) {
        warn!("error hooks not installed: {}", e);
    }

    if let Err(e) = when_ready(move |doc| init_page(&doc, &config)) {
        warn!("page scripts not started: {}", e);
    }
}

fn when_ready<F>(ready: F) -> Result<(), SiteError>
where
    F: FnOnce(Document) + 'static,
{
    let doc = dom::document()?;
    if doc.ready_state() != "loading" {
        ready(doc);
        return Ok(());
    }

    let mut ready = Some(ready);
    let target = doc.clone();
    dom::listen(&target, "DOMContentLoaded", move |_: Event| {
        if let Some(ready) = ready.take() {
            ready(doc.clone());
        }
    })
}

fn init_page(doc: &Document, config: &SiteConfig) {
    let window = match dom::window() {
        Ok(window) => window,
        Err(e) => {
            warn!("{}", e);
            return;
        }
    };
    let reduced_motion = motion::prefers_reduced_motion(&window);

    step("readiness markers", page::mark_ready(doc, config));
    step("navigation", nav::init_menu(doc));
    step("header", nav::init_header(&window, doc, config));
    step("stats counter", counter::init(&window, doc, config));
    step("section reveal", reveal::init(&window, doc, config));
    if !reduced_motion {
        step("tilt", tilt::init(doc, config));
    }
    step("booking form", booking::init(doc));
    info!("page enhancements ready (reduced motion: {})", reduced_motion);
}

fn step(name: &str, result: Result<(), SiteError>) {
    if let Err(e) = result {
        warn!("{} not initialised: {}", name, e);
    }
}

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{js_sys, Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Window};

use crate::config::SiteConfig;
use crate::dom;
use crate::error::SiteError;
use crate::motion;

/// `transition-delay` for the `index`-th card in a revealed section.
pub fn stagger_delay(index: usize, step: f64) -> String {
    // Round to milliseconds so 3 * 0.05 prints as 0.15, not 0.15000000000000002.
    let seconds = (index as f64 * step * 1000.0).round() / 1000.0;
    format!("{}s", seconds)
}

/// Delays for `cards` feature cards, or none when motion is reduced.
pub fn card_delays(cards: usize, reduced_motion: bool, step: f64) -> Vec<String> {
    if reduced_motion {
        return Vec::new();
    }
    (0..cards).map(|i| stagger_delay(i, step)).collect()
}

pub fn init(window: &Window, doc: &Document, config: &SiteConfig) -> Result<(), SiteError> {
    let sections = dom::query_all::<Element>(doc, ".section");
    if sections.is_empty() {
        return Ok(());
    }
    let step = config.stagger_step;
    let window = window.clone();

    let on_intersect = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
        for entry in entries
            .iter()
            .filter_map(|e| e.dyn_into::<IntersectionObserverEntry>().ok())
        {
            if !entry.is_intersecting() {
                continue;
            }
            let section = entry.target();
            let _ = section.class_list().add_1("is-visible");
            // The preference can change while the page is open.
            let cards = dom::query_all_in::<HtmlElement>(&section, ".feature-card");
            let delays = card_delays(cards.len(), motion::prefers_reduced_motion(&window), step);
            for (card, delay) in cards.iter().zip(&delays) {
                dom::set_style(card, "transition-delay", delay);
            }
        }
    });

    let options = IntersectionObserverInit::new();
    options.set_threshold(&config.reveal_threshold.into());
    options.set_root_margin(config.reveal_root_margin);
    let observer = IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &options)?;
    on_intersect.forget();

    for section in &sections {
        section.class_list().add_1("reveal-on-scroll")?;
        observer.observe(section);
    }
    log::debug!("observing {} sections for reveal", sections.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_card_has_no_delay() {
        assert_eq!(stagger_delay(0, 0.05), "0s");
    }

    #[test]
    fn delays_step_cleanly() {
        assert_eq!(stagger_delay(1, 0.05), "0.05s");
        assert_eq!(stagger_delay(3, 0.05), "0.15s");
        assert_eq!(stagger_delay(20, 0.05), "1s");
    }

    #[test]
    fn reduced_motion_leaves_cards_unstaggered() {
        assert!(card_delays(4, true, 0.05).is_empty());
    }

    #[test]
    fn every_card_gets_a_delay() {
        assert_eq!(card_delays(3, false, 0.05), vec!["0s", "0.05s", "0.1s"]);
        assert!(card_delays(0, false, 0.05).is_empty());
    }
}

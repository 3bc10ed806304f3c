//! Count-up animation for the headline statistic.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{js_sys, Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Window};

use crate::config::SiteConfig;
use crate::dom;
use crate::error::SiteError;
use crate::motion::{self, CountUp};

const STATS_SELECTOR: &str = ".stats-value[data-count]";

/// What the counter should do with a `data-count` attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum CounterPlan {
    /// Show the text as-is.
    Static(String),
    Animate(CountUp),
}

pub fn plan(raw: Option<&str>, reduced_motion: bool, config: &SiteConfig) -> CounterPlan {
    let raw = raw.map(str::trim).unwrap_or_default();
    if reduced_motion {
        let text = if raw.is_empty() { config.count_fallback } else { raw };
        return CounterPlan::Static(text.to_string());
    }
    match raw.parse::<i64>() {
        Ok(target) => CounterPlan::Animate(CountUp::new(target, config.count_duration_ms)),
        Err(_) => CounterPlan::Static(raw.to_string()),
    }
}

pub fn init(window: &Window, doc: &Document, config: &SiteConfig) -> Result<(), SiteError> {
    let Some(value_el) = dom::query::<Element>(doc, STATS_SELECTOR) else {
        return Ok(());
    };
    let raw = value_el.get_attribute("data-count");
    let count = match plan(raw.as_deref(), motion::prefers_reduced_motion(window), config) {
        CounterPlan::Static(text) => {
            value_el.set_text_content(Some(&text));
            return Ok(());
        }
        CounterPlan::Animate(count) => count,
    };

    let bar = value_el.closest(".stats-bar").ok().flatten().unwrap_or_else(|| value_el.clone());

    let on_intersect = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            let hit = entries
                .iter()
                .filter_map(|e| e.dyn_into::<IntersectionObserverEntry>().ok())
                .any(|e| e.is_intersecting());
            if !hit {
                return;
            }
            observer.disconnect();
            if let Err(e) = run(count, value_el.clone()) {
                log::warn!("stats counter could not start: {}", e);
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_threshold(&config.count_threshold.into());
    let observer = IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &options)?;
    observer.observe(&bar);
    on_intersect.forget();
    Ok(())
}

fn run(count: CountUp, value_el: Element) -> Result<(), SiteError> {
    let mut start: Option<f64> = None;
    dom::animation_loop(move |now| {
        let started = *start.get_or_insert(now);
        let (value, done) = count.frame(now - started);
        value_el.set_text_content(Some(&value.to_string()));
        !done
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduced_motion_shows_final_value() {
        let config = SiteConfig::default();
        assert_eq!(plan(Some("12"), true, &config), CounterPlan::Static("12".into()));
    }

    #[test]
    fn reduced_motion_falls_back_when_empty() {
        let config = SiteConfig::default();
        assert_eq!(plan(Some(""), true, &config), CounterPlan::Static("6".into()));
        assert_eq!(plan(None, true, &config), CounterPlan::Static("6".into()));
    }

    #[test]
    fn animates_parsed_target() {
        let config = SiteConfig::default();
        assert_eq!(
            plan(Some(" 6 "), false, &config),
            CounterPlan::Animate(CountUp::new(6, 1500.0))
        );
    }

    #[test]
    fn unparsable_count_is_shown_verbatim() {
        let config = SiteConfig::default();
        assert_eq!(plan(Some("6+"), false, &config), CounterPlan::Static("6+".into()));
    }
}

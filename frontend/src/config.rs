use log::Level;

const DEFAULT_FORM_ENDPOINT: &str = "https://formspree.io/f/mrbljknd";

/// Form relay the booking form posts to. Override at build time with
/// `FORM_ENDPOINT=... trunk build`.
pub fn get_form_endpoint() -> &'static str {
    option_env!("FORM_ENDPOINT").unwrap_or(DEFAULT_FORM_ENDPOINT)
}

#[cfg(debug_assertions)]
pub fn get_log_level() -> Level {
    Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn get_log_level() -> Level {
    Level::Info
}

/// Tunables shared by the page controllers.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    pub toast_show_ms: u32,
    /// `scrollY` past which the header is marked `scrolled`.
    pub scroll_threshold: f64,
    pub scroll_padding_fallback: &'static str,
    pub count_duration_ms: f64,
    pub count_threshold: f64,
    pub count_fallback: &'static str,
    pub reveal_threshold: f64,
    pub reveal_root_margin: &'static str,
    /// Seconds added per feature card when a section is revealed.
    pub stagger_step: f64,
    pub hero_tilt_deg: f64,
    pub card_tilt_deg: f64,
    /// Fraction of the remaining distance covered per animation frame.
    pub tilt_damping: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            toast_show_ms: 8_000,
            scroll_threshold: 50.0,
            scroll_padding_fallback: "72px",
            count_duration_ms: 1_500.0,
            count_threshold: 0.3,
            count_fallback: "6",
            reveal_threshold: 0.08,
            reveal_root_margin: "0px 0px -40px 0px",
            stagger_step: 0.05,
            hero_tilt_deg: 8.0,
            card_tilt_deg: 4.0,
            tilt_damping: 0.08,
        }
    }
}

use web_sys::Window;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Whether the visitor asked the OS for reduced motion. Browsers without
/// `matchMedia` count as "no preference".
pub fn prefers_reduced_motion(window: &Window) -> bool {
    match window.match_media(REDUCED_MOTION_QUERY) {
        Ok(Some(list)) => list.matches(),
        _ => false,
    }
}

pub fn ease_out_quad(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(2)
}

/// Eased count from zero to `target` over `duration_ms`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountUp {
    target: i64,
    duration_ms: f64,
}

impl CountUp {
    pub fn new(target: i64, duration_ms: f64) -> Self {
        Self { target, duration_ms }
    }

    /// Value to display `elapsed_ms` after the start, and whether the
    /// animation has finished.
    pub fn frame(&self, elapsed_ms: f64) -> (i64, bool) {
        let progress = if self.duration_ms <= 0.0 {
            1.0
        } else {
            (elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        };
        let value = (ease_out_quad(progress) * self.target as f64).round() as i64;
        (value, progress >= 1.0)
    }
}

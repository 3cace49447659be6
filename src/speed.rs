use std::fmt;

use crate::config::AutoScrollConfig;

/// Human-readable bucket for a scroll speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedLabel {
    Slow,
    Medium,
    Fast,
    VeryFast,
}

impl SpeedLabel {
    pub fn for_speed(pixels_per_second: f64) -> Self {
        if pixels_per_second < 1500.0 {
            SpeedLabel::Slow
        } else if pixels_per_second < 4000.0 {
            SpeedLabel::Medium
        } else if pixels_per_second < 7000.0 {
            SpeedLabel::Fast
        } else {
            SpeedLabel::VeryFast
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedLabel::Slow => "Slow",
            SpeedLabel::Medium => "Medium",
            SpeedLabel::Fast => "Fast",
            SpeedLabel::VeryFast => "Very Fast",
        }
    }
}

impl fmt::Display for SpeedLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scroll speed in pixels per second, always inside the configured range.
///
/// Out-of-range requests are clamped to the nearest bound. Non-finite input
/// falls back to the configured default speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSpeed(f64);

impl ScrollSpeed {
    pub fn new(pixels_per_second: f64, config: &AutoScrollConfig) -> Self {
        let value = if pixels_per_second.is_finite() {
            pixels_per_second
        } else {
            config.default_speed
        };
        // `f64::clamp` panics on an inverted range.
        let lo = config.min_speed.min(config.max_speed);
        let hi = config.max_speed.max(config.min_speed);
        Self(value.clamp(lo, hi))
    }

    /// Snap to the slider step before clamping.
    pub fn from_slider(value: f64, config: &AutoScrollConfig) -> Self {
        if !value.is_finite() {
            return Self::new(value, config);
        }
        let snapped = (value / config.speed_step).round() * config.speed_step;
        Self::new(snapped, config)
    }

    pub fn get(&self) -> f64 {
        self.0
    }

    pub fn label(&self) -> SpeedLabel {
        SpeedLabel::for_speed(self.0)
    }

    /// Distance covered over `delta_ms` milliseconds.
    pub fn pixels_for(&self, delta_ms: f64) -> f64 {
        self.0 * delta_ms / 1000.0
    }
}

impl Default for ScrollSpeed {
    fn default() -> Self {
        let config = AutoScrollConfig::default();
        Self::new(config.default_speed, &config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_breakpoints() {
        assert_eq!(SpeedLabel::for_speed(500.0), SpeedLabel::Slow);
        assert_eq!(SpeedLabel::for_speed(1499.0), SpeedLabel::Slow);
        assert_eq!(SpeedLabel::for_speed(1500.0), SpeedLabel::Medium);
        assert_eq!(SpeedLabel::for_speed(3999.0), SpeedLabel::Medium);
        assert_eq!(SpeedLabel::for_speed(4000.0), SpeedLabel::Fast);
        assert_eq!(SpeedLabel::for_speed(7000.0), SpeedLabel::VeryFast);
        assert_eq!(SpeedLabel::VeryFast.to_string(), "Very Fast");
    }

    #[test]
    fn test_clamps_out_of_range() {
        let config = AutoScrollConfig::default();
        assert_eq!(ScrollSpeed::new(10.0, &config).get(), 500.0);
        assert_eq!(ScrollSpeed::new(50_000.0, &config).get(), 10_000.0);
        assert_eq!(ScrollSpeed::new(f64::NAN, &config).get(), 2400.0);
    }

    #[test]
    fn test_inverted_range_does_not_panic() {
        let config = AutoScrollConfig { min_speed: 900.0, max_speed: 100.0, ..Default::default() };
        let speed = ScrollSpeed::new(5000.0, &config).get();
        assert!((speed - 900.0).abs() < 1e-9);
    }

    #[test]
    fn test_slider_snaps_to_step() {
        let config = AutoScrollConfig::default();
        assert_eq!(ScrollSpeed::from_slider(2449.0, &config).get(), 2400.0);
        assert_eq!(ScrollSpeed::from_slider(2451.0, &config).get(), 2500.0);
        assert_eq!(ScrollSpeed::from_slider(120.0, &config).get(), 500.0);
    }

    #[test]
    fn test_pixels_for_delta() {
        let speed = ScrollSpeed::default();
        assert!((speed.pixels_for(500.0) - 1200.0).abs() < 1e-9);
    }
}

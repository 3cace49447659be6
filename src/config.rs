//! Tuning values for auto-scroll and the decorative progress curves.
//!
//! Every value here is a presentation constant. They are grouped into plain
//! structs with `Default` so hosts can override them from JSON without
//! touching the animation code.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Slowest selectable scroll speed, pixels per second.
pub const MIN_SPEED: f64 = 500.0;
/// Fastest selectable scroll speed, pixels per second.
pub const MAX_SPEED: f64 = 10_000.0;
/// Speed used when nothing else is configured.
pub const DEFAULT_SPEED: f64 = 2400.0;
/// Granularity of the speed slider.
pub const SPEED_STEP: f64 = 100.0;
/// Distance from the bottom (in pixels) treated as "reached the end".
pub const END_EPSILON_PX: f64 = 10.0;

/// Hard ceiling on any branch opacity.
pub const OPACITY_CAP: f64 = 0.8;
/// Progress after which branch opacity starts to be boosted.
pub const BOOST_START: f64 = 0.7;
/// Boost gained per unit of progress past `BOOST_START`.
pub const BOOST_RATE: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutoScrollConfig {
    pub min_speed: f64,
    pub max_speed: f64,
    pub default_speed: f64,
    pub speed_step: f64,
    pub end_epsilon_px: f64,
}

impl AutoScrollConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.min_speed > 0.0 && self.min_speed <= self.max_speed) {
            anyhow::bail!("Invalid speed range: {} ..= {}", self.min_speed, self.max_speed);
        }
        if !(self.speed_step > 0.0) {
            anyhow::bail!("Speed step must be positive, got {}", self.speed_step);
        }
        Ok(())
    }
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            default_speed: DEFAULT_SPEED,
            speed_step: SPEED_STEP,
            end_epsilon_px: END_EPSILON_PX,
        }
    }
}

/// Opacity curve shared by all branch entities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgressCurve {
    pub opacity_cap: f64,
    pub boost_start: f64,
    pub boost_rate: f64,
}

impl Default for ProgressCurve {
    fn default() -> Self {
        Self {
            opacity_cap: OPACITY_CAP,
            boost_start: BOOST_START,
            boost_rate: BOOST_RATE,
        }
    }
}

impl ProgressCurve {
    /// Multiplier applied in the final stretch of the timeline.
    pub fn end_boost(&self, progress: f64) -> f64 {
        if progress > self.boost_start {
            1.0 + (progress - self.boost_start) * self.boost_rate
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineConfig {
    pub auto_scroll: AutoScrollConfig,
    pub curve: ProgressCurve,
}

impl TimelineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TimelineConfig =
            serde_json::from_str(json).context("Failed to parse timeline config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        Self::from_json(&contents)
    }

    fn validate(&self) -> Result<()> {
        self.auto_scroll.validate()?;
        if self.curve.opacity_cap < 0.0 {
            anyhow::bail!("Opacity cap must not be negative");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_boost_only_after_start() {
        let curve = ProgressCurve::default();
        assert_eq!(curve.end_boost(0.5), 1.0);
        assert_eq!(curve.end_boost(0.7), 1.0);
        assert!((curve.end_boost(0.9) - 1.3).abs() < 1e-9);
        assert!((curve.end_boost(1.0) - 1.45).abs() < 1e-9);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = TimelineConfig::from_json(r#"{"autoScroll": {"endEpsilonPx": 4}}"#).unwrap();
        assert_eq!(config.auto_scroll.end_epsilon_px, 4.0);
        assert_eq!(config.auto_scroll.default_speed, DEFAULT_SPEED);
        assert_eq!(config.curve, ProgressCurve::default());
    }

    #[test]
    fn test_rejects_inverted_speed_range() {
        let err = TimelineConfig::from_json(r#"{"autoScroll": {"minSpeed": 900, "maxSpeed": 100}}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_scroll_settings() {
        assert!(AutoScrollConfig::default().validate().is_ok());
        let inverted = AutoScrollConfig { min_speed: 900.0, max_speed: 100.0, ..Default::default() };
        let err = inverted.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid speed range"));
        let no_step = AutoScrollConfig { speed_step: 0.0, ..Default::default() };
        assert!(no_step.validate().is_err());
    }
}

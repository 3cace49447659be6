//! Progress mapping for the decorative branch lines.
//!
//! Given a normalized progress through the timeline (`0.0..=1.0`), compute how
//! visible each branch entity is. Everything here is a pure function of the
//! progress value and the static entity table.

use serde::{Deserialize, Serialize};

use crate::config::ProgressCurve;

/// Which side of the main line a branch leans towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn sign(&self) -> f64 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// Looping opacity animation applied to a branch while it is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Shimmer {
    Slow,
    Medium,
    Fast,
    Pulse,
    Wave,
}

impl Shimmer {
    /// Length of one shimmer cycle in seconds.
    pub fn period_secs(&self) -> f64 {
        match self {
            Shimmer::Slow => 8.0,
            Shimmer::Medium => 4.0,
            Shimmer::Fast => 2.0,
            Shimmer::Pulse => 3.0,
            Shimmer::Wave => 5.0,
        }
    }

    /// Peak opacity multiplier reached during a cycle.
    pub fn peak_gain(&self) -> f64 {
        match self {
            Shimmer::Slow => 1.3,
            Shimmer::Medium => 1.5,
            Shimmer::Fast => 1.6,
            Shimmer::Pulse => 1.4,
            Shimmer::Wave => 1.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchEntity {
    pub id: &'static str,
    /// Progress at which the branch starts to render.
    pub activation_point: f64,
    pub base_opacity: f64,
    /// How fast the branch fades in, in opacity per unit of progress.
    pub fade_rate: f64,
    pub side: Side,
    pub shimmer: Shimmer,
    /// Progress at which the branch rejoins the main line, if it ever does.
    pub merge_point: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchVisualState {
    pub entity_id: &'static str,
    pub opacity: f64,
    pub is_visible: bool,
    pub has_merged: bool,
    /// Rendered length of the branch as a fraction of the full timeline.
    pub extent: f64,
}

impl BranchEntity {
    /// Fade-in factor in `0.0..=1.0`; zero before activation.
    pub fn fade_in(&self, progress: f64) -> f64 {
        if progress < self.activation_point {
            return 0.0;
        }
        ((progress - self.activation_point) * self.fade_rate).min(1.0)
    }

    /// Non-finite progress is treated as the start of the timeline.
    pub fn visual_state(&self, progress: f64, curve: &ProgressCurve) -> BranchVisualState {
        let progress = if progress.is_finite() { progress } else { 0.0 };
        if progress < self.activation_point {
            return BranchVisualState {
                entity_id: self.id,
                opacity: 0.0,
                is_visible: false,
                has_merged: false,
                extent: 0.0,
            };
        }

        let raw = self.base_opacity * self.fade_in(progress) * curve.end_boost(progress);
        let opacity = raw.min(curve.opacity_cap).max(0.0);

        let (has_merged, extent) = match self.merge_point {
            Some(merge) if progress >= merge => (true, merge - self.activation_point),
            Some(_) => (false, progress - self.activation_point),
            // Unmerged branches run to the end of the timeline once they appear.
            None => (false, 1.0 - self.activation_point),
        };

        BranchVisualState {
            entity_id: self.id,
            opacity,
            is_visible: true,
            has_merged,
            extent: extent.max(0.0),
        }
    }
}

/// Visual state of every entity at `progress`, in table order.
pub fn map_progress(
    progress: f64,
    entities: &[BranchEntity],
    curve: &ProgressCurve,
) -> Vec<BranchVisualState> {
    entities
        .iter()
        .map(|entity| entity.visual_state(progress, curve))
        .collect()
}

/// Normalized progress for a scroll offset. Zero for pages that cannot scroll.
pub fn scroll_progress(offset: f64, max_offset: f64) -> f64 {
    if max_offset <= 0.0 || !offset.is_finite() {
        return 0.0;
    }
    (offset / max_offset).clamp(0.0, 1.0)
}

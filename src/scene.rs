//! Composes the full decorative layer for one progress value.
//!
//! The progress mapper decides how visible each branch is; this module adds
//! the layout that goes with it (lateral position, line width, glow, fork
//! curves) and packages everything as a serializable frame for the renderer.

use glam::Vec2;
use serde::Serialize;

use crate::chains::{
    block_to_progress, ChainBranch, HardFork, BEACON_CHAIN, CHAIN_BRANCHES, HARD_FORKS,
    MILESTONE_GLOWS,
};
use crate::config::ProgressCurve;
use crate::progress::{BranchVisualState, Shimmer, Side};

/// Progress after which branch lines thicken and glow.
const WIDE_LINE_PROGRESS: f64 = 0.8;
/// Progress after which the live section of the main line shimmers.
const LIVE_SECTION_PROGRESS: f64 = 0.85;

const GHOST_FORK_OPACITY: f64 = 0.15;
const GHOST_FORK_FADE_RATE: f64 = 8.0;

/// Horizontal band (percent of width) branch origins are spread across.
const SPREAD_START_PERCENT: f64 = 15.0;
const SPREAD_RANGE_PERCENT: f64 = 70.0;
const SPREAD_MIN_PERCENT: f64 = 12.0;
const SPREAD_MAX_PERCENT: f64 = 88.0;

/// Quadratic curve in pixel space, relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadCurve {
    pub start: Vec2,
    pub control: Vec2,
    pub end: Vec2,
}

impl QuadCurve {
    pub fn to_svg_path(&self) -> String {
        format!(
            "M {} {} Q {} {} {} {}",
            self.start.x, self.start.y, self.control.x, self.control.y, self.end.x, self.end.y
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchLine {
    pub name: &'static str,
    pub milestone: &'static str,
    pub color: &'static str,
    pub shimmer: Shimmer,
    pub shimmer_period_secs: f64,
    /// Opacity at the brightest point of the shimmer cycle.
    pub shimmer_peak_opacity: f64,
    pub start_progress: f64,
    #[serde(flatten)]
    pub state: BranchVisualState,
    /// Horizontal position of the branch origin, percent of the width.
    pub x_percent: f64,
    pub label_opacity: f64,
    pub width_px: f64,
    pub glow_px: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeaconLine {
    pub name: &'static str,
    pub color: &'static str,
    pub start_progress: f64,
    pub merge_progress: f64,
    #[serde(flatten)]
    pub state: BranchVisualState,
    pub offset_px: f64,
    pub label_opacity: f64,
    pub connector_opacity: f64,
    /// SVG path of the curve back into the main line, once merged.
    pub merge_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostFork {
    pub id: &'static str,
    pub name: &'static str,
    pub progress: f64,
    pub side: Side,
    pub offset_px: f64,
    pub translate_x_px: f64,
    pub opacity: f64,
    pub tip_opacity: f64,
    pub path: String,
    pub tip: [f32; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlowMarker {
    pub id: &'static str,
    pub progress: f64,
    pub color: &'static str,
    pub size_px: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneFrame {
    pub progress: f64,
    pub branches: Vec<BranchLine>,
    pub beacon: Option<BeaconLine>,
    pub ghost_forks: Vec<GhostFork>,
    pub glows: Vec<GlowMarker>,
    pub live_section: bool,
}

impl SceneFrame {
    /// Build the frame for `progress`. Values outside `0..=1` are clamped.
    pub fn compose(progress: f64, curve: &ProgressCurve) -> Self {
        let progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            progress,
            branches: branch_lines(progress, curve),
            beacon: beacon_line(progress, curve),
            ghost_forks: HARD_FORKS
                .iter()
                .enumerate()
                .filter_map(|(index, fork)| ghost_fork(index, fork, progress))
                .collect(),
            glows: MILESTONE_GLOWS
                .iter()
                .filter(|glow| progress >= block_to_progress(glow.block))
                .map(|glow| GlowMarker {
                    id: glow.id,
                    progress: block_to_progress(glow.block),
                    color: glow.color,
                    size_px: glow.size_px,
                })
                .collect(),
            live_section: progress > LIVE_SECTION_PROGRESS,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            log::error!("Failed to serialize scene frame: {}", e);
            "{}".to_string()
        })
    }
}

fn branch_lines(progress: f64, curve: &ProgressCurve) -> Vec<BranchLine> {
    let total = CHAIN_BRANCHES.len() as f64;
    let wide = progress > WIDE_LINE_PROGRESS;

    CHAIN_BRANCHES
        .iter()
        .map(|chain| (chain, chain.entity().visual_state(progress, curve)))
        .filter(|(_, state)| state.is_visible)
        .enumerate()
        .map(|(index, (chain, state))| BranchLine {
            name: chain.name,
            milestone: chain.milestone,
            color: chain.color,
            shimmer: chain.shimmer,
            shimmer_period_secs: chain.shimmer.period_secs(),
            shimmer_peak_opacity: state.opacity * chain.shimmer.peak_gain(),
            start_progress: chain.start_progress(),
            x_percent: origin_x_percent(index, total, chain),
            label_opacity: (state.opacity * 2.0).min(0.7),
            width_px: if wide { 3.0 } else { 2.0 },
            glow_px: if wide {
                8.0 * (progress - WIDE_LINE_PROGRESS) * 5.0
            } else {
                0.0
            },
            state,
        })
        .collect()
}

/// Spread visible origins evenly, nudged by side and index so they don't line up.
fn origin_x_percent(index: usize, total: f64, chain: &ChainBranch) -> f64 {
    let base = SPREAD_START_PERCENT + (index as f64 / total) * SPREAD_RANGE_PERCENT;
    let variation = chain.side.sign() * 5.0 + ((index * 7) % 10) as f64 - 5.0;
    (base + variation).clamp(SPREAD_MIN_PERCENT, SPREAD_MAX_PERCENT)
}

fn beacon_line(progress: f64, curve: &ProgressCurve) -> Option<BeaconLine> {
    let state = BEACON_CHAIN.entity().visual_state(progress, curve);
    if !state.is_visible {
        return None;
    }

    let offset = BEACON_CHAIN.lateral_offset_px as f32;
    let merge_path = state.has_merged.then(|| {
        QuadCurve {
            start: Vec2::new(offset, 0.0),
            control: Vec2::new(offset, 30.0),
            end: Vec2::new(0.0, 50.0),
        }
        .to_svg_path()
    });

    Some(BeaconLine {
        name: BEACON_CHAIN.name,
        color: BEACON_CHAIN.color,
        start_progress: block_to_progress(BEACON_CHAIN.start_block),
        merge_progress: block_to_progress(BEACON_CHAIN.merge_block),
        offset_px: BEACON_CHAIN.lateral_offset_px,
        label_opacity: state.opacity * 1.2,
        connector_opacity: state.opacity * 0.7,
        merge_path,
        state,
    })
}

fn ghost_fork(index: usize, fork: &HardFork, progress: f64) -> Option<GhostFork> {
    let fork_progress = block_to_progress(fork.block);
    if progress < fork_progress {
        return None;
    }

    let side = if index % 2 == 0 { Side::Left } else { Side::Right };
    let offset = 20.0 + (index % 3) as f32 * 8.0;
    let fade_in = ((progress - fork_progress) * GHOST_FORK_FADE_RATE).min(1.0);
    let opacity = GHOST_FORK_OPACITY * fade_in;

    let curve = match side {
        Side::Right => QuadCurve {
            start: Vec2::ZERO,
            control: Vec2::new(offset, 15.0),
            end: Vec2::new(offset + 25.0, 40.0),
        },
        Side::Left => QuadCurve {
            start: Vec2::new(offset + 30.0, 0.0),
            control: Vec2::new(30.0, 15.0),
            end: Vec2::new(5.0, 40.0),
        },
    };

    Some(GhostFork {
        id: fork.id,
        name: fork.name,
        progress: fork_progress,
        side,
        offset_px: offset as f64,
        translate_x_px: match side {
            Side::Left => -(offset as f64 + 30.0),
            Side::Right => 0.0,
        },
        opacity,
        tip_opacity: opacity * 0.5,
        path: curve.to_svg_path(),
        tip: curve.end.to_array(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_at_start() {
        let frame = SceneFrame::compose(0.0, &ProgressCurve::default());
        assert!(frame.branches.is_empty());
        assert!(frame.beacon.is_none());
        assert!(frame.ghost_forks.is_empty());
        assert!(frame.glows.is_empty());
        assert!(!frame.live_section);
    }

    #[test]
    fn test_everything_visible_at_end() {
        let frame = SceneFrame::compose(1.0, &ProgressCurve::default());
        assert_eq!(frame.branches.len(), CHAIN_BRANCHES.len());
        assert_eq!(frame.ghost_forks.len(), HARD_FORKS.len());
        assert_eq!(frame.glows.len(), MILESTONE_GLOWS.len());
        assert!(frame.live_section);
        for line in &frame.branches {
            assert!(line.state.opacity <= 0.8);
            assert_eq!(line.width_px, 3.0);
            assert!((line.glow_px - 8.0).abs() < 1e-9);
            assert!(line.x_percent >= 12.0 && line.x_percent <= 88.0);
        }
    }

    #[test]
    fn test_beacon_merges_with_curve() {
        let curve = ProgressCurve::default();
        let before = SceneFrame::compose(0.6, &curve).beacon.unwrap();
        assert!(!before.state.has_merged);
        assert!(before.merge_path.is_none());

        let after = SceneFrame::compose(0.75, &curve).beacon.unwrap();
        assert!(after.state.has_merged);
        assert_eq!(after.merge_path.as_deref(), Some("M 40 0 Q 40 30 0 50"));
        assert!((after.state.extent - (after.merge_progress - after.start_progress)).abs() < 1e-9);
    }

    #[test]
    fn test_ghost_forks_alternate_sides() {
        let frame = SceneFrame::compose(1.0, &ProgressCurve::default());
        let homestead = &frame.ghost_forks[0];
        assert_eq!(homestead.side, Side::Left);
        assert_eq!(homestead.offset_px, 20.0);
        assert_eq!(homestead.translate_x_px, -50.0);
        assert_eq!(homestead.path, "M 50 0 Q 30 15 5 40");

        let byzantium = &frame.ghost_forks[1];
        assert_eq!(byzantium.side, Side::Right);
        assert_eq!(byzantium.offset_px, 28.0);
        assert_eq!(byzantium.tip, [53.0, 40.0]);
        assert!((byzantium.opacity - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_progress_is_clamped() {
        let curve = ProgressCurve::default();
        assert_eq!(SceneFrame::compose(1.7, &curve), SceneFrame::compose(1.0, &curve));
        assert_eq!(SceneFrame::compose(f64::NAN, &curve).progress, 0.0);
    }

    #[test]
    fn test_frame_serializes_camel_case() {
        let json = SceneFrame::compose(0.9, &ProgressCurve::default()).to_json();
        assert!(json.contains("\"liveSection\":true"));
        assert!(json.contains("\"entityId\":\"base\""));
        assert!(json.contains("\"hasMerged\":true"));
    }
}

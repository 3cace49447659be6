//! Sweeps the progress mapper over the bundled chain table and checks the
//! bundled timeline document loads.

use eth_timeline::chains::{block_to_progress, branch_entities, BEACON_CHAIN};
use eth_timeline::config::ProgressCurve;
use eth_timeline::progress::{map_progress, BranchEntity, Shimmer, Side};
use eth_timeline::scene::SceneFrame;
use eth_timeline::timeline::{MarkerPlacement, TimelineDocument};

const STEPS: usize = 1000;

fn sweep() -> impl Iterator<Item = f64> {
    (0..=STEPS).map(|i| i as f64 / STEPS as f64)
}

#[test]
fn test_nothing_visible_before_activation() {
    let entities = branch_entities();
    let curve = ProgressCurve::default();
    for p in sweep() {
        for (entity, state) in entities.iter().zip(map_progress(p, &entities, &curve)) {
            if p < entity.activation_point {
                assert!(!state.is_visible, "{} visible at {}", entity.id, p);
                assert_eq!(state.opacity, 0.0);
            } else {
                assert!(state.is_visible);
            }
        }
    }
}

#[test]
fn test_opacity_never_exceeds_cap() {
    let entities = branch_entities();
    let curve = ProgressCurve::default();
    for p in sweep() {
        for state in map_progress(p, &entities, &curve) {
            assert!(state.opacity >= 0.0 && state.opacity <= curve.opacity_cap);
        }
    }
}

#[test]
fn test_fade_in_monotonic_until_boost() {
    let entities = branch_entities();
    let curve = ProgressCurve::default();
    let mut previous = vec![0.0; entities.len()];
    for p in sweep().take_while(|p| *p <= 0.7) {
        for (i, state) in map_progress(p, &entities, &curve).iter().enumerate() {
            assert!(state.opacity >= previous[i], "{} dropped at {}", state.entity_id, p);
            previous[i] = state.opacity;
        }
    }
}

#[test]
fn test_reference_scenario() {
    let entity = BranchEntity {
        id: "reference",
        activation_point: 0.5,
        base_opacity: 0.4,
        fade_rate: 5.0,
        side: Side::Right,
        shimmer: Shimmer::Wave,
        merge_point: None,
    };
    let states = map_progress(0.9, &[entity], &ProgressCurve::default());
    assert!((states[0].opacity - 0.52).abs() < 1e-9);
}

#[test]
fn test_mapping_is_pure() {
    let entities = branch_entities();
    let curve = ProgressCurve::default();
    for p in [0.0, 0.3, 0.71, 0.9, 1.0] {
        assert_eq!(map_progress(p, &entities, &curve), map_progress(p, &entities, &curve));
        assert_eq!(SceneFrame::compose(p, &curve), SceneFrame::compose(p, &curve));
    }
}

#[test]
fn test_beacon_extent_stops_growing_after_merge() {
    let curve = ProgressCurve::default();
    let merge = block_to_progress(BEACON_CHAIN.merge_block);
    let start = block_to_progress(BEACON_CHAIN.start_block);
    for p in sweep().filter(|p| *p >= merge) {
        let beacon = SceneFrame::compose(p, &curve).beacon.unwrap();
        assert!(beacon.state.has_merged);
        assert!((beacon.state.extent - (merge - start)).abs() < 1e-9);
    }
}

#[test]
fn test_bundled_timeline_loads() {
    let doc = TimelineDocument::from_json(include_str!("../data/timeline.json")).unwrap();
    let sections = doc.sections();
    assert_eq!(sections.len(), 4);

    let london = sections
        .iter()
        .flat_map(|s| s.entries.iter())
        .find(|e| e.node.id == "london")
        .unwrap();
    assert_eq!(london.marker, MarkerPlacement::Bottom);
    assert_eq!(london.node.block_label().as_deref(), Some("#12,965,000"));
    assert_eq!(london.node.formatted_date(), "August 5, 2021");
}

//! End-to-end auto-scroll runs against a simulated page.
//!
//! Run with: cargo test --test autoscroll_scenarios

use eth_timeline::animator::{FrameOutcome, ScrollAnimator};
use eth_timeline::config::AutoScrollConfig;
use eth_timeline::host::{ScrollHost, SimulatedHost};
use eth_timeline::speed::SpeedLabel;

/// Fire pending frames at a fixed rate until the chain ends or `max_frames` is hit.
fn run_frames(
    animator: &mut ScrollAnimator,
    host: &mut SimulatedHost,
    start_ms: f64,
    frame_ms: f64,
    max_frames: usize,
) -> Vec<FrameOutcome> {
    let mut outcomes = Vec::new();
    let mut timestamp = start_ms;
    while outcomes.len() < max_frames {
        let Some(&handle) = host.pending_frames().first() else {
            break;
        };
        assert!(host.fire(handle));
        outcomes.push(animator.on_frame(host, timestamp));
        // One callback in flight at a time.
        assert!(host.pending_frames().len() <= 1);
        timestamp += frame_ms;
    }
    outcomes
}

#[test]
fn test_two_frames_at_default_speed() {
    let mut host = SimulatedHost::new(20_000.0, 1000.0);
    let mut animator = ScrollAnimator::default();
    assert_eq!(animator.set_speed(2400.0).label(), SpeedLabel::Medium);

    animator.start(&mut host);
    let outcomes = run_frames(&mut animator, &mut host, 0.0, 500.0, 2);

    assert_eq!(outcomes, vec![FrameOutcome::Primed, FrameOutcome::Advanced(1200.0)]);
    assert!((host.scroll_offset() - 1200.0).abs() < 1e-9);
}

#[test]
fn test_runs_to_bottom_and_stops_itself() {
    let mut host = SimulatedHost::new(5000.0, 1000.0);
    let mut animator = ScrollAnimator::default();
    animator.set_speed(3000.0);
    animator.start(&mut host);

    let outcomes = run_frames(&mut animator, &mut host, 0.0, 1000.0 / 60.0, 10_000);

    assert_eq!(outcomes.last(), Some(&FrameOutcome::ReachedEnd));
    assert!(!animator.is_playing());
    assert!(host.pending_frames().is_empty());
    assert!(host.scroll_offset() >= host.max_scroll_offset() - 10.0);
    // 4000px at 50px/frame: the end is found within a frame or two of arriving.
    assert!(outcomes.len() <= 83, "took {} frames", outcomes.len());
}

#[test]
fn test_starting_inside_end_band_stops_on_second_frame() {
    let mut host = SimulatedHost::new(3000.0, 1000.0);
    host.set_offset(1995.0);
    let mut animator = ScrollAnimator::default();
    animator.start(&mut host);

    let outcomes = run_frames(&mut animator, &mut host, 0.0, 16.0, 10);
    assert_eq!(outcomes, vec![FrameOutcome::Primed, FrameOutcome::ReachedEnd]);
    assert_eq!(host.scroll_offset(), 1995.0);
}

#[test]
fn test_pause_mid_run_leaves_no_zombie_frames() {
    let mut host = SimulatedHost::new(50_000.0, 1000.0);
    let mut animator = ScrollAnimator::default();
    animator.start(&mut host);
    run_frames(&mut animator, &mut host, 0.0, 16.0, 20);

    animator.stop(&mut host);
    let offset = host.scroll_offset();
    assert!(host.pending_frames().is_empty());

    // Nothing left to fire, so nothing moves.
    let outcomes = run_frames(&mut animator, &mut host, 1000.0, 16.0, 20);
    assert!(outcomes.is_empty());
    assert_eq!(host.scroll_offset(), offset);
}

#[test]
fn test_rapid_toggling_never_stacks_callbacks() {
    let mut host = SimulatedHost::new(50_000.0, 1000.0);
    let mut animator = ScrollAnimator::default();

    for _ in 0..50 {
        animator.toggle(&mut host);
        assert!(host.pending_frames().len() <= 1);
    }
    // Even number of toggles: stopped, and every request was cancelled.
    assert!(!animator.is_playing());
    assert!(host.pending_frames().is_empty());
    assert_eq!(host.requested_count(), host.cancelled_count());
}

#[test]
fn test_resume_primes_again() {
    let mut host = SimulatedHost::new(50_000.0, 1000.0);
    let mut animator = ScrollAnimator::default();
    animator.start(&mut host);
    run_frames(&mut animator, &mut host, 0.0, 100.0, 3);
    animator.stop(&mut host);
    let offset = host.scroll_offset();

    animator.start(&mut host);
    let outcomes = run_frames(&mut animator, &mut host, 60_000.0, 100.0, 2);
    assert_eq!(outcomes[0], FrameOutcome::Primed);
    assert_eq!(outcomes[1], FrameOutcome::Advanced(240.0));
    assert!((host.scroll_offset() - (offset + 240.0)).abs() < 1e-9);
}

#[test]
fn test_custom_epsilon_from_config() {
    let config = AutoScrollConfig {
        end_epsilon_px: 100.0,
        ..AutoScrollConfig::default()
    };
    let mut host = SimulatedHost::new(3000.0, 1000.0);
    host.set_offset(1920.0);
    let mut animator = ScrollAnimator::new(config);
    animator.start(&mut host);

    let outcomes = run_frames(&mut animator, &mut host, 0.0, 16.0, 10);
    assert_eq!(outcomes.last(), Some(&FrameOutcome::ReachedEnd));
}

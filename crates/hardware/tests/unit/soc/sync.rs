//! # Clock-Domain Primitive Tests

use pretty_assertions::assert_eq;
use rstest::rstest;
use socsim_core::soc::sync::{ClockDivider, Edge, MIN_SYNC_STAGES, Synchronizer};

#[rstest]
#[case(0, MIN_SYNC_STAGES)]
#[case(1, MIN_SYNC_STAGES)]
#[case(2, 2)]
#[case(5, 5)]
fn synchronizer_depth_is_clamped(#[case] requested: usize, #[case] expected: usize) {
    assert_eq!(Synchronizer::<bool>::new(requested).depth(), expected);
}

#[test]
fn sample_appears_after_depth_clocks() {
    let mut sync = Synchronizer::<u8>::new(3);
    assert_eq!(sync.clock(7), 0);
    assert_eq!(sync.clock(0), 0);
    assert_eq!(sync.clock(0), 7);
    assert_eq!(sync.output(), 7);
    assert_eq!(sync.clock(0), 0);
}

#[test]
fn divider_of_one_rises_every_fourth_step() {
    let mut clock = ClockDivider::new(1);
    let edges: Vec<Edge> = (0..8).map(|_| clock.step()).collect();
    assert_eq!(
        edges,
        vec![
            Edge::None,
            Edge::Rising,
            Edge::None,
            Edge::Falling,
            Edge::None,
            Edge::Rising,
            Edge::None,
            Edge::Falling,
        ]
    );
}

#[test]
fn divider_of_zero_toggles_every_step() {
    let mut clock = ClockDivider::new(0);
    assert!(!clock.level());
    assert_eq!(clock.step(), Edge::Rising);
    assert!(clock.level());
    assert_eq!(clock.step(), Edge::Falling);
    assert!(!clock.level());
}

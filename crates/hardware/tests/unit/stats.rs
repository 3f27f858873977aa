//! # Statistics Tests

use pretty_assertions::assert_eq;
use socsim_core::core::clint::{InterruptSource, TrapTransition};
use socsim_core::core::ports::EdgeReport;
use socsim_core::stats::SimStats;

#[test]
fn counters_start_at_zero() {
    let stats = SimStats::default();
    assert_eq!(stats.steps, 0);
    assert_eq!(stats.cycles, 0);
    assert_eq!(stats.instructions_retired, 0);
    assert_eq!(stats.frames_presented, 0);
}

#[test]
fn edges_are_classified() {
    let mut stats = SimStats::default();
    let retire = EdgeReport {
        retired: true,
        transition: TrapTransition::None,
    };
    stats.record_edge(&retire);
    stats.record_edge(&retire);
    stats.record_edge(&EdgeReport {
        retired: false,
        transition: TrapTransition::Interrupt {
            source: InterruptSource::Timer,
        },
    });
    stats.record_edge(&EdgeReport {
        retired: false,
        transition: TrapTransition::Exception { cause: 11 },
    });
    stats.record_edge(&EdgeReport {
        retired: true,
        transition: TrapTransition::Return,
    });
    stats.record_edge(&EdgeReport::IDLE);

    assert_eq!(stats.cycles, 6);
    assert_eq!(stats.instructions_retired, 3);
    assert_eq!(stats.interrupts, 1);
    assert_eq!(stats.exceptions, 1);
    assert_eq!(stats.trap_returns, 1);
}

#[test]
fn report_serializes_without_start_time() {
    let stats = SimStats {
        cycles: 42,
        ..SimStats::default()
    };
    let json = serde_json::to_value(&stats).expect("serialize");
    assert_eq!(json["cycles"], 42);
    assert!(json.get("start_time").is_none());
}

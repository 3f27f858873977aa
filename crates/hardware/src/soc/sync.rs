//! Clock-domain crossing primitives.
//!
//! 1. **Synchronizer:** A fixed-depth register chain a signal must traverse before
//!    the receiving domain may treat it as stable.
//! 2. **ClockDivider:** Derives a slower clock from the driver's step counter and
//!    reports its edges.

use std::collections::VecDeque;

/// Smallest permitted synchronizer depth.
pub const MIN_SYNC_STAGES: usize = 2;

/// Multi-stage synchronizer clocked by the receiving domain.
///
/// A sample becomes visible at `output` after the `depth`-th clock, counting
/// the one that samples it. Depths below [`MIN_SYNC_STAGES`] are raised to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Synchronizer<T> {
    stages: VecDeque<T>,
}

impl<T: Copy + Default> Synchronizer<T> {
    /// Creates a synchronizer with `depth` stages, all holding `T::default()`.
    pub fn new(depth: usize) -> Self {
        let depth = depth.max(MIN_SYNC_STAGES);
        Self {
            stages: std::iter::repeat_n(T::default(), depth).collect(),
        }
    }

    /// Number of register stages.
    pub fn depth(&self) -> usize {
        self.stages.len()
    }

    /// Shifts `sample` into the first stage and returns the new output.
    pub fn clock(&mut self, sample: T) -> T {
        let _ = self.stages.pop_front();
        self.stages.push_back(sample);
        self.output()
    }

    /// Returns the value of the last stage.
    pub fn output(&self) -> T {
        self.stages.front().copied().unwrap_or_default()
    }
}

/// Edge produced by a [`ClockDivider`] step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    /// No transition this step.
    None,
    /// Low to high.
    Rising,
    /// High to low.
    Falling,
}

/// Clock derived from the driver's step counter.
///
/// The level toggles whenever the internal counter exceeds `divider`, so one
/// full period spans `2 * (divider + 1)` steps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClockDivider {
    divider: u32,
    counter: u32,
    level: bool,
}

impl ClockDivider {
    /// Creates a divider whose clock starts low.
    pub const fn new(divider: u32) -> Self {
        Self {
            divider,
            counter: 0,
            level: false,
        }
    }

    /// Advances one driver step and reports the resulting edge.
    pub const fn step(&mut self) -> Edge {
        self.counter += 1;
        if self.counter > self.divider {
            self.counter = 0;
            self.level = !self.level;
            if self.level { Edge::Rising } else { Edge::Falling }
        } else {
            Edge::None
        }
    }

    /// Current clock level.
    pub const fn level(&self) -> bool {
        self.level
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-timestep clock that converts wall-clock time into simulation ticks.

use std::time::Duration;

use handlords_core::{tick_interval, Command, Phase};

/// Pure system that emits one [`Command::AdvanceTick`] per elapsed tick interval.
#[derive(Debug, Default)]
pub struct FixedTimestep {
    accumulator: Duration,
}

impl FixedTimestep {
    /// Creates a clock with an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulates `elapsed` and emits the ticks that became due.
    ///
    /// The interval is derived from `ticks_per_second` on every call, so rate
    /// changes apply from the next whole interval. Time only accumulates while
    /// the game is playing; any other phase discards the leftover fraction.
    pub fn handle(
        &mut self,
        elapsed: Duration,
        phase: Phase,
        ticks_per_second: u32,
        out: &mut Vec<Command>,
    ) {
        if phase != Phase::Playing {
            self.accumulator = Duration::ZERO;
            return;
        }

        self.accumulator = self.accumulator.saturating_add(elapsed);
        let interval = tick_interval(ticks_per_second);
        while self.accumulator >= interval {
            self.accumulator -= interval;
            out.push(Command::AdvanceTick);
        }
    }

    /// Time accumulated towards the next tick.
    #[must_use]
    pub const fn pending(&self) -> Duration {
        self.accumulator
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Rolling combat statistics derived from world events.

use std::collections::VecDeque;

use handlords_core::{Event, Phase, TickStats};

/// Summary of recent combat published after every observed tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CombatReport {
    /// Tick of the most recent combat included in the report.
    pub tick: u64,
    /// Number of ticks currently held in the window.
    pub window_ticks: u32,
    /// Battles resolved across the window.
    pub battles_in_window: u32,
    /// Tallies of the most recent tick.
    pub latest: TickStats,
    /// Share of the latest tick's attempts that ended in a battle, in percent.
    pub efficiency_percent: u32,
}

impl CombatReport {
    /// Battles per simulated second when the window spans one second of ticks.
    #[must_use]
    pub const fn combats_per_second(&self) -> u32 {
        self.battles_in_window
    }
}

/// Pure analytics system that keeps one second of combat tallies.
#[derive(Debug, Default)]
pub struct CombatAnalytics {
    window: VecDeque<TickStats>,
    last_tick: u64,
    last_report: Option<CombatReport>,
}

impl CombatAnalytics {
    /// Creates a new analytics system with an empty window.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last report published by the system, if any.
    #[must_use]
    pub fn last_report(&self) -> Option<&CombatReport> {
        self.last_report.as_ref()
    }

    /// Consumes world events and refreshes the report when combat was observed.
    ///
    /// The window holds the latest `ticks_per_second` ticks, clamped to at
    /// least one. Returning to [`Phase::Ready`] discards the window.
    pub fn handle(&mut self, events: &[Event], ticks_per_second: u32) {
        let capacity = usize::try_from(ticks_per_second.max(1)).unwrap_or(usize::MAX);
        let mut combat_observed = false;

        for event in events {
            match event {
                Event::CombatResolved { tick, stats } => {
                    self.window.push_back(*stats);
                    self.last_tick = *tick;
                    combat_observed = true;
                }
                Event::PhaseChanged {
                    to: Phase::Ready, ..
                } => {
                    self.window.clear();
                    self.last_report = None;
                    combat_observed = false;
                }
                _ => {}
            }
        }

        while self.window.len() > capacity {
            let _ = self.window.pop_front();
        }

        if combat_observed {
            self.last_report = self.summarise();
        }
    }

    fn summarise(&self) -> Option<CombatReport> {
        let latest = *self.window.back()?;
        let battles_in_window = self
            .window
            .iter()
            .fold(0u32, |total, stats| total.saturating_add(stats.battles));
        Some(CombatReport {
            tick: self.last_tick,
            window_ticks: u32::try_from(self.window.len()).unwrap_or(u32::MAX),
            battles_in_window,
            latest,
            efficiency_percent: efficiency_percent(latest),
        })
    }
}

fn efficiency_percent(stats: TickStats) -> u32 {
    if stats.attempts == 0 {
        return 0;
    }
    let percent = u64::from(stats.battles) * 100 / u64::from(stats.attempts);
    u32::try_from(percent).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combat(tick: u64, battles: u32) -> Event {
        Event::CombatResolved {
            tick,
            stats: TickStats {
                attempts: 240,
                battles,
                same_owner: 200,
                wall_or_empty: 240 - 200 - battles,
            },
        }
    }

    #[test]
    fn no_report_before_combat() {
        let mut analytics = CombatAnalytics::new();
        analytics.handle(&[Event::ConfigChanged], 15);
        assert!(analytics.last_report().is_none());
    }

    #[test]
    fn window_keeps_one_second_of_ticks() {
        let mut analytics = CombatAnalytics::new();
        for tick in 1..=20 {
            analytics.handle(&[combat(tick, 2)], 15);
        }

        let report = analytics.last_report().copied().expect("report published");
        assert_eq!(report.tick, 20);
        assert_eq!(report.window_ticks, 15);
        assert_eq!(report.battles_in_window, 30);
        assert_eq!(report.combats_per_second(), 30);
    }

    #[test]
    fn shrinking_the_rate_trims_the_window() {
        let mut analytics = CombatAnalytics::new();
        let events: Vec<Event> = (1..=10).map(|tick| combat(tick, tick as u32)).collect();
        analytics.handle(&events, 15);
        analytics.handle(&[combat(11, 11)], 3);

        let report = analytics.last_report().copied().expect("report published");
        assert_eq!(report.window_ticks, 3);
        assert_eq!(report.battles_in_window, 9 + 10 + 11);
    }

    #[test]
    fn efficiency_uses_the_latest_tick() {
        let mut analytics = CombatAnalytics::new();
        analytics.handle(&[combat(1, 0), combat(2, 24)], 15);

        let report = analytics.last_report().copied().expect("report published");
        assert_eq!(report.efficiency_percent, 10);
        assert_eq!(efficiency_percent(TickStats::default()), 0);
    }

    #[test]
    fn returning_to_ready_clears_the_window() {
        let mut analytics = CombatAnalytics::new();
        analytics.handle(&[combat(1, 5)], 15);

        analytics.handle(
            &[Event::PhaseChanged {
                from: Phase::Lost,
                to: Phase::Ready,
            }],
            15,
        );
        assert!(analytics.last_report().is_none());

        analytics.handle(&[combat(1, 1)], 15);
        let report = analytics.last_report().copied().expect("report published");
        assert_eq!(report.window_ticks, 1);
        assert_eq!(report.battles_in_window, 1);
    }
}

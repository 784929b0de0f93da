//! Tick clock: turns elapsed wall-clock time into a bounded number of ticks.
//!
//! Running time accrues to `active_time`, paused time is banked into
//! `accumulated_time`. Every processed tick spends exactly one update
//! interval. Normal speed only spends active time; fast speed and
//! fast-forward may also spend banked time.

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::core::scheduler::ProcessScheduler;
use crate::util::clock::TimeSource;

/// Something that can be advanced one tick at a time.
pub trait TickTarget {
    /// Advance by one tick.
    fn process_tick(&mut self);
}

impl TickTarget for ProcessScheduler {
    fn process_tick(&mut self) {
        Self::process_tick(self);
    }
}

/// Simulation speed selected by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameSpeed {
    /// No ticks; elapsed time is banked.
    Paused,
    /// One tick per update interval of active time.
    #[default]
    Normal,
    /// Tick budget multiplied, drawing on banked time.
    Fast,
}

/// Time accounting between wall-clock samples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTime {
    last_update_ms: u64,
    active_time_ms: u64,
    accumulated_time_ms: u64,
}

impl GameTime {
    /// Start tracking at `now_ms` with nothing owed.
    #[must_use]
    pub const fn new(now_ms: u64) -> Self {
        Self {
            last_update_ms: now_ms,
            active_time_ms: 0,
            accumulated_time_ms: 0,
        }
    }

    /// Time owed to the simulation at normal speed.
    #[must_use]
    pub const fn active_time_ms(&self) -> u64 {
        self.active_time_ms
    }

    /// Banked time, spendable by fast speed and fast-forward.
    #[must_use]
    pub const fn accumulated_time_ms(&self) -> u64 {
        self.accumulated_time_ms
    }

    /// Add time elapsed since the last sample to active time.
    pub fn update_active_time(&mut self, now_ms: u64) {
        self.active_time_ms += self.take_elapsed(now_ms);
    }

    /// Bank time elapsed since the last sample. Active time is untouched.
    pub fn update_accumulated_time(&mut self, now_ms: u64) {
        self.accumulated_time_ms += self.take_elapsed(now_ms);
    }

    /// Spend one interval for the next tick if enough time is available.
    pub fn check_time_for_next_tick(&mut self, interval_ms: u64, allow_banked: bool) -> bool {
        if self.active_time_ms >= interval_ms {
            self.active_time_ms -= interval_ms;
            return true;
        }
        if allow_banked && self.accumulated_time_ms >= interval_ms {
            self.accumulated_time_ms -= interval_ms;
            return true;
        }
        false
    }

    /// Bank active time into accumulated time (used before pausing).
    pub fn bank_active_time(&mut self) {
        self.accumulated_time_ms += std::mem::take(&mut self.active_time_ms);
    }

    fn take_elapsed(&mut self, now_ms: u64) -> u64 {
        let elapsed = now_ms.saturating_sub(self.last_update_ms);
        self.last_update_ms = self.last_update_ms.max(now_ms);
        elapsed
    }
}

/// Drives a [`TickTarget`] from wall-clock time.
pub struct TickClock<S> {
    time: GameTime,
    speed: GameSpeed,
    source: S,
    update_interval_ms: u64,
    fast_speed_multiplier: u32,
    max_updates_per_tick: u32,
}

impl<S: TimeSource> TickClock<S> {
    /// Create a clock at normal speed starting from the source's current time.
    #[must_use]
    pub fn new(settings: &Settings, source: S) -> Self {
        let time = GameTime::new(source.now_ms());
        Self {
            time,
            speed: GameSpeed::Normal,
            source,
            update_interval_ms: settings.update_interval_ms,
            fast_speed_multiplier: settings.fast_speed_multiplier,
            max_updates_per_tick: settings.max_updates_per_tick,
        }
    }

    /// Current speed.
    #[must_use]
    pub const fn speed(&self) -> GameSpeed {
        self.speed
    }

    /// Time accounting state.
    #[must_use]
    pub const fn time(&self) -> &GameTime {
        &self.time
    }

    /// Change speed. Time elapsed so far is credited at the old speed.
    pub fn set_speed(&mut self, speed: GameSpeed) {
        self.sample();
        if speed == GameSpeed::Paused {
            self.time.bank_active_time();
        }
        tracing::info!(from = ?self.speed, to = ?speed, "game speed changed");
        self.speed = speed;
    }

    /// Restore time accounting. Time since the snapshot was taken is banked.
    pub fn restore(&mut self, time: GameTime, speed: GameSpeed) {
        self.time = time;
        self.speed = speed;
        self.time.update_accumulated_time(self.source.now_ms());
    }

    /// Reset for a new game.
    pub fn reset(&mut self) {
        self.time = GameTime::new(self.source.now_ms());
        self.speed = GameSpeed::Normal;
    }

    /// Process as many ticks as elapsed time and speed allow, capped at
    /// `max_updates_per_tick`. Returns the number processed.
    pub fn update_state<T: TickTarget + ?Sized>(&mut self, target: &mut T) -> u32 {
        self.sample();

        let mut max_updates = self.time.active_time_ms() / self.update_interval_ms;
        match self.speed {
            GameSpeed::Paused => max_updates = 0,
            GameSpeed::Normal => {}
            GameSpeed::Fast => {
                max_updates = max_updates.saturating_mul(u64::from(self.fast_speed_multiplier));
            }
        }

        let ceiling = u64::from(self.max_updates_per_tick);
        if max_updates > ceiling {
            tracing::debug!(max_updates, ceiling, "tick budget clamped");
        }
        let max_updates = u32::try_from(max_updates.min(ceiling)).unwrap_or(self.max_updates_per_tick);

        self.process_ticks(target, max_updates, self.speed == GameSpeed::Fast)
    }

    /// Spend up to `max_updates_per_tick` ticks from active and banked time
    /// regardless of speed. Returns true if the whole ceiling was used, which
    /// means more time may still be pending.
    pub fn fast_forward_state<T: TickTarget + ?Sized>(&mut self, target: &mut T) -> bool {
        self.sample();

        let max_updates = self.max_updates_per_tick;
        let ticks_processed = self.process_ticks(target, max_updates, true);
        tracing::info!(ticks_processed, max_updates, "fast forward");

        ticks_processed == max_updates
    }

    fn sample(&mut self) {
        let now = self.source.now_ms();
        if self.speed == GameSpeed::Paused {
            self.time.update_accumulated_time(now);
        } else {
            self.time.update_active_time(now);
        }
    }

    fn process_ticks<T: TickTarget + ?Sized>(
        &mut self,
        target: &mut T,
        max_updates: u32,
        allow_banked: bool,
    ) -> u32 {
        let mut ticks_processed = 0;
        while ticks_processed < max_updates
            && self
                .time
                .check_time_for_next_tick(self.update_interval_ms, allow_banked)
        {
            target.process_tick();
            ticks_processed += 1;
        }
        ticks_processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::clock::ManualTimeSource;

    #[derive(Default)]
    struct Counter(u32);

    impl TickTarget for Counter {
        fn process_tick(&mut self) {
            self.0 += 1;
        }
    }

    fn settings() -> Settings {
        Settings {
            update_interval_ms: 1000,
            fast_speed_multiplier: 3,
            max_updates_per_tick: 5,
            message_log_size: 10,
        }
    }

    #[test]
    fn test_catch_up_is_clamped() {
        let source = ManualTimeSource::new(0);
        let mut clock = TickClock::new(&settings(), source.clone());
        let mut counter = Counter::default();

        source.advance(12_000);
        assert_eq!(clock.update_state(&mut counter), 5);
        assert_eq!(counter.0, 5);
        assert_eq!(clock.time().active_time_ms(), 7_000);
    }

    #[test]
    fn test_partial_interval_waits() {
        let source = ManualTimeSource::new(0);
        let mut clock = TickClock::new(&settings(), source.clone());
        let mut counter = Counter::default();

        source.advance(2_500);
        assert_eq!(clock.update_state(&mut counter), 2);
        source.advance(400);
        assert_eq!(clock.update_state(&mut counter), 0);
        source.advance(100);
        assert_eq!(clock.update_state(&mut counter), 1);
    }

    #[test]
    fn test_paused_time_is_banked_not_ticked() {
        let source = ManualTimeSource::new(0);
        let mut clock = TickClock::new(&settings(), source.clone());
        let mut counter = Counter::default();

        clock.set_speed(GameSpeed::Paused);
        source.advance(4_000);
        assert_eq!(clock.update_state(&mut counter), 0);
        assert_eq!(clock.time().active_time_ms(), 0);
        assert_eq!(clock.time().accumulated_time_ms(), 4_000);

        clock.set_speed(GameSpeed::Normal);
        assert_eq!(clock.update_state(&mut counter), 0);
    }

    #[test]
    fn test_fast_speed_spends_banked_time() {
        let source = ManualTimeSource::new(0);
        let mut clock = TickClock::new(&settings(), source.clone());
        let mut counter = Counter::default();

        clock.set_speed(GameSpeed::Paused);
        source.advance(10_000);
        clock.set_speed(GameSpeed::Fast);
        source.advance(1_000);

        // 1 interval of active time * 3 = 3 ticks, the extra 2 come from the bank.
        assert_eq!(clock.update_state(&mut counter), 3);
        assert_eq!(clock.time().accumulated_time_ms(), 8_000);
    }

    #[test]
    fn test_fast_forward_reports_pending_time() {
        let source = ManualTimeSource::new(0);
        let mut clock = TickClock::new(&settings(), source.clone());
        let mut counter = Counter::default();

        clock.set_speed(GameSpeed::Paused);
        source.advance(7_000);

        assert!(clock.fast_forward_state(&mut counter));
        assert_eq!(counter.0, 5);
        assert!(!clock.fast_forward_state(&mut counter));
        assert_eq!(counter.0, 7);
    }
}

//! Simulated game clock.
//!
//! The clock counts whole game minutes and turns elapsed time into the
//! ordered tick stream plants react to:
//! - a `Minute` tick for every minute crossed
//! - an `Hour` tick when the minute wraps to zero
//! - a `Day` tick at midnight
//!
//! Ticks that fall on the same instant are emitted minute first, then hour,
//! then day.

use serde::{Deserialize, Serialize};

/// Minutes in a game hour.
pub const MINUTES_PER_HOUR: u64 = 60;
/// Minutes in a game day.
pub const MINUTES_PER_DAY: u64 = 24 * MINUTES_PER_HOUR;

/// One clock event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClockTick {
    /// A minute passed; `minute` is the minute of the hour (0-59).
    Minute {
        /// Minute of the hour
        minute: u32,
    },
    /// An hour passed; `hour` is the hour of the day (0-23).
    Hour {
        /// Hour of the day
        hour: u32,
    },
    /// A day passed; `day` is the number of completed days.
    Day {
        /// Days elapsed
        day: u32,
    },
}

/// Game time measured in whole minutes since the start of the game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    total_minutes: u64,
}

impl GameClock {
    /// Create a clock at midnight of day zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { total_minutes: 0 }
    }

    /// Create with a specific starting time.
    ///
    /// # Arguments
    /// * `hour` - Starting hour (0-23)
    /// * `minute` - Starting minute (0-59)
    /// * `day` - Starting day number
    #[must_use]
    pub fn with_time(hour: u32, minute: u32, day: u32) -> Self {
        let hour = u64::from(hour.min(23));
        let minute = u64::from(minute.min(59));
        Self {
            total_minutes: u64::from(day) * MINUTES_PER_DAY + hour * MINUTES_PER_HOUR + minute,
        }
    }

    /// Reinstate a clock from a saved minute count.
    #[must_use]
    pub const fn from_total_minutes(total_minutes: u64) -> Self {
        Self { total_minutes }
    }

    /// Total elapsed game minutes.
    #[must_use]
    pub const fn total_minutes(&self) -> u64 {
        self.total_minutes
    }

    /// Current minute of the hour (0-59).
    #[must_use]
    pub const fn minute(&self) -> u32 {
        (self.total_minutes % MINUTES_PER_HOUR) as u32
    }

    /// Current hour of the day (0-23).
    #[must_use]
    pub const fn hour(&self) -> u32 {
        ((self.total_minutes % MINUTES_PER_DAY) / MINUTES_PER_HOUR) as u32
    }

    /// Completed days.
    #[must_use]
    pub const fn day(&self) -> u32 {
        (self.total_minutes / MINUTES_PER_DAY) as u32
    }

    /// Get a formatted time string (Day N HH:MM).
    #[must_use]
    pub fn format_time(&self) -> String {
        format!("Day {} {:02}:{:02}", self.day(), self.hour(), self.minute())
    }

    /// Advance by `minutes` and return every tick crossed, in order.
    pub fn advance(&mut self, minutes: u32) -> Vec<ClockTick> {
        let mut ticks = Vec::with_capacity(minutes as usize);
        for _ in 0..minutes {
            self.total_minutes += 1;
            ticks.push(ClockTick::Minute {
                minute: self.minute(),
            });
            if self.minute() == 0 {
                ticks.push(ClockTick::Hour { hour: self.hour() });
                if self.hour() == 0 {
                    ticks.push(ClockTick::Day { day: self.day() });
                }
            }
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_time() {
        let clock = GameClock::with_time(14, 30, 2);
        assert_eq!(clock.hour(), 14);
        assert_eq!(clock.minute(), 30);
        assert_eq!(clock.day(), 2);
        assert_eq!(clock.format_time(), "Day 2 14:30");

        let clamped = GameClock::with_time(99, 99, 0);
        assert_eq!(clamped.hour(), 23);
        assert_eq!(clamped.minute(), 59);
    }

    #[test]
    fn test_minute_ticks() {
        let mut clock = GameClock::new();
        let ticks = clock.advance(3);
        assert_eq!(
            ticks,
            vec![
                ClockTick::Minute { minute: 1 },
                ClockTick::Minute { minute: 2 },
                ClockTick::Minute { minute: 3 },
            ]
        );
        assert_eq!(clock.total_minutes(), 3);
    }

    #[test]
    fn test_hour_follows_minute() {
        let mut clock = GameClock::with_time(5, 59, 0);
        let ticks = clock.advance(1);
        assert_eq!(
            ticks,
            vec![ClockTick::Minute { minute: 0 }, ClockTick::Hour { hour: 6 }]
        );
    }

    #[test]
    fn test_day_rollover() {
        let mut clock = GameClock::with_time(23, 59, 0);
        let ticks = clock.advance(1);
        assert_eq!(
            ticks,
            vec![
                ClockTick::Minute { minute: 0 },
                ClockTick::Hour { hour: 0 },
                ClockTick::Day { day: 1 },
            ]
        );
        assert_eq!(clock.day(), 1);
    }

    #[test]
    fn test_full_day_counts() {
        let mut clock = GameClock::new();
        let ticks = clock.advance(MINUTES_PER_DAY as u32);

        let hours = ticks
            .iter()
            .filter(|t| matches!(t, ClockTick::Hour { .. }))
            .count();
        let days = ticks
            .iter()
            .filter(|t| matches!(t, ClockTick::Day { .. }))
            .count();
        assert_eq!(ticks.len() - hours - days, 1440);
        assert_eq!(hours, 24);
        assert_eq!(days, 1);
    }
}

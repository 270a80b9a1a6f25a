//! Weekly business hours: which times of day accept appointments on each weekday.
//!
//! A [`WeeklySchedule`] is plain configuration. It is passed into every engine
//! call rather than read from a global, so tests and tenants can each supply
//! their own table.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::timefmt::{format_time, hhmm};

/// Step between candidate start times when none is configured.
pub const DEFAULT_GRANULARITY_MINUTES: u32 = 30;

const fn hm(hour: u32, min: u32) -> NaiveTime {
    match NaiveTime::from_hms_opt(hour, min, 0) {
        Some(t) => t,
        None => panic!("invalid time-of-day literal"),
    }
}

const OPENING: NaiveTime = hm(8, 0);
const LUNCH_START: NaiveTime = hm(12, 0);
const LUNCH_END: NaiveTime = hm(13, 0);
const WEEKDAY_CLOSING: NaiveTime = hm(19, 0);
const SATURDAY_CLOSING: NaiveTime = hm(16, 0);

/// A half-open `[start, end)` span of time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenInterval {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl OpenInterval {
    /// Build an interval, rejecting empty or inverted spans.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self> {
        if start >= end {
            return Err(SlotError::InvalidSchedule(format!(
                "interval {}-{} must start before it ends",
                format_time(start),
                format_time(end)
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, t: NaiveTime) -> bool {
        self.start <= t && t < self.end
    }

    /// Strict overlap with `[start, end)`; touching endpoints do not count.
    pub fn overlaps(&self, start: NaiveTime, end: NaiveTime) -> bool {
        start < self.end && end > self.start
    }
}

impl fmt::Display for OpenInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", format_time(self.start), format_time(self.end))
    }
}

/// Opening hours for one weekday.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessDay {
    /// Open intervals, sorted by start and non-overlapping. Empty means closed.
    #[serde(default)]
    pub open: Vec<OpenInterval>,
    /// A break no appointment may overlap, even when both of its ends fall in
    /// open hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_interval: Option<OpenInterval>,
}

impl BusinessDay {
    pub fn closed() -> Self {
        Self::default()
    }

    pub fn new(open: Vec<OpenInterval>) -> Self {
        Self {
            open,
            break_interval: None,
        }
    }

    pub fn with_break(mut self, break_interval: OpenInterval) -> Self {
        self.break_interval = Some(break_interval);
        self
    }

    pub fn is_closed(&self) -> bool {
        self.open.is_empty()
    }

    /// Whether `t` lies inside any open interval of this day.
    pub fn is_open_at(&self, t: NaiveTime) -> bool {
        self.open.iter().any(|interval| interval.contains(t))
    }

    /// Whether `[start, end)` overlaps this day's break, if it has one.
    pub fn crosses_break(&self, start: NaiveTime, end: NaiveTime) -> bool {
        self.break_interval.is_some_and(|b| b.overlaps(start, end))
    }

    fn validate(&self, weekday: Weekday) -> Result<()> {
        let inverted = self
            .open
            .iter()
            .chain(self.break_interval.iter())
            .find(|interval| interval.start >= interval.end);
        if let Some(interval) = inverted {
            return Err(SlotError::InvalidSchedule(format!(
                "{weekday}: interval {interval} must start before it ends"
            )));
        }
        for pair in self.open.windows(2) {
            if pair[1].start < pair[0].end {
                return Err(SlotError::InvalidSchedule(format!(
                    "{weekday}: intervals {} and {} overlap or are out of order",
                    pair[0], pair[1]
                )));
            }
        }
        Ok(())
    }
}

/// Business hours for a whole week plus the candidate step size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    #[serde(default = "default_granularity")]
    pub slot_granularity_minutes: u32,
    #[serde(default)]
    pub monday: BusinessDay,
    #[serde(default)]
    pub tuesday: BusinessDay,
    #[serde(default)]
    pub wednesday: BusinessDay,
    #[serde(default)]
    pub thursday: BusinessDay,
    #[serde(default)]
    pub friday: BusinessDay,
    #[serde(default)]
    pub saturday: BusinessDay,
    #[serde(default)]
    pub sunday: BusinessDay,
}

fn default_granularity() -> u32 {
    DEFAULT_GRANULARITY_MINUTES
}

/// Weekdays in calendar order, Monday first.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

impl Default for WeeklySchedule {
    /// Mon–Fri 08:00–12:00 and 13:00–19:00 with a 12:00–13:00 lunch break,
    /// Saturday 08:00–16:00, Sunday closed, 30-minute steps.
    fn default() -> Self {
        let weekday = BusinessDay::new(vec![
            OpenInterval {
                start: OPENING,
                end: LUNCH_START,
            },
            OpenInterval {
                start: LUNCH_END,
                end: WEEKDAY_CLOSING,
            },
        ])
        .with_break(OpenInterval {
            start: LUNCH_START,
            end: LUNCH_END,
        });
        let saturday = BusinessDay::new(vec![OpenInterval {
            start: OPENING,
            end: SATURDAY_CLOSING,
        }]);

        Self {
            slot_granularity_minutes: DEFAULT_GRANULARITY_MINUTES,
            monday: weekday.clone(),
            tuesday: weekday.clone(),
            wednesday: weekday.clone(),
            thursday: weekday.clone(),
            friday: weekday,
            saturday,
            sunday: BusinessDay::closed(),
        }
    }
}

impl WeeklySchedule {
    /// A schedule with every day closed.
    pub fn closed() -> Self {
        Self {
            slot_granularity_minutes: DEFAULT_GRANULARITY_MINUTES,
            monday: BusinessDay::closed(),
            tuesday: BusinessDay::closed(),
            wednesday: BusinessDay::closed(),
            thursday: BusinessDay::closed(),
            friday: BusinessDay::closed(),
            saturday: BusinessDay::closed(),
            sunday: BusinessDay::closed(),
        }
    }

    pub fn day(&self, weekday: Weekday) -> &BusinessDay {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    pub fn day_mut(&mut self, weekday: Weekday) -> &mut BusinessDay {
        match weekday {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        }
    }

    pub fn with_day(mut self, weekday: Weekday, day: BusinessDay) -> Self {
        *self.day_mut(weekday) = day;
        self
    }

    pub fn with_granularity(mut self, minutes: u32) -> Self {
        self.slot_granularity_minutes = minutes;
        self
    }

    pub fn granularity(&self) -> Duration {
        Duration::minutes(i64::from(self.slot_granularity_minutes))
    }

    /// Check the invariants the engine relies on: positive granularity and,
    /// per day, non-empty intervals sorted by start without overlap.
    pub fn validate(&self) -> Result<()> {
        if self.slot_granularity_minutes == 0 {
            return Err(SlotError::InvalidSchedule(
                "slot granularity must be positive".to_string(),
            ));
        }
        for weekday in WEEK {
            self.day(weekday).validate(weekday)?;
        }
        Ok(())
    }
}

/// Whether `at` falls inside an open interval of its weekday.
///
/// Closed days always return `false`.
pub fn is_within_business_hours(schedule: &WeeklySchedule, at: NaiveDateTime) -> bool {
    schedule.day(at.weekday()).is_open_at(at.time())
}

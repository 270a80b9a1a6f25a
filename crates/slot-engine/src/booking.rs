//! Existing bookings and the overlap test candidates are checked against.
//!
//! Two spans overlap when `a.start < b.end && a.end > b.start`. A booking that
//! ends exactly when a candidate starts (or the reverse) is NOT an overlap.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// An appointment already on the books, owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedInterval {
    pub start: NaiveDateTime,
    pub duration_minutes: u32,
}

impl BookedInterval {
    /// Build a booking, rejecting zero-length durations.
    pub fn new(start: NaiveDateTime, duration_minutes: u32) -> Result<Self> {
        let booking = Self {
            start,
            duration_minutes,
        };
        booking.validate()?;
        Ok(booking)
    }

    /// End of the booking, saturating at `NaiveDateTime::MAX`.
    pub fn end(&self) -> NaiveDateTime {
        self.start
            .checked_add_signed(Duration::minutes(i64::from(self.duration_minutes)))
            .unwrap_or(NaiveDateTime::MAX)
    }

    /// Whether `[start, end)` intersects this booking.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        start < self.end() && end > self.start
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.duration_minutes == 0 {
            return Err(SlotError::InvalidBooking(format!(
                "booking at {} has zero duration",
                self.start.format("%Y-%m-%d %H:%M")
            )));
        }
        Ok(())
    }
}

/// The first booking that intersects `[start, end)`, if any.
pub fn first_overlap(
    bookings: &[BookedInterval],
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Option<&BookedInterval> {
    bookings.iter().find(|b| b.overlaps(start, end))
}

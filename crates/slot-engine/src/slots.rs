//! Available appointment start times for a single day.
//!
//! For every open interval of the target weekday, candidates are generated from
//! the interval start in steps of the schedule's granularity. A candidate
//! survives when:
//!
//! 1. it ends no later than the interval that generated it (the first one that
//!    doesn't ends the sweep for that interval),
//! 2. its first and last minute both fall within business hours,
//! 3. it does not overlap the day's break interval,
//! 4. it does not overlap any existing booking.
//!
//! Survivors are returned deduplicated and in ascending order. The computation
//! is pure: identical inputs always yield identical output.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::booking::{first_overlap, BookedInterval};
use crate::error::{Result, SlotError};
use crate::schedule::{is_within_business_hours, WeeklySchedule};
use crate::timefmt::{format_time, hhmm, parse_date};

/// A validated availability query for one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRequest {
    date: NaiveDate,
    service_duration_minutes: u32,
    existing: Vec<BookedInterval>,
}

impl SlotRequest {
    /// Build a request, failing fast on a zero service duration or a
    /// zero-length booking.
    pub fn new(
        date: NaiveDate,
        service_duration_minutes: u32,
        existing: Vec<BookedInterval>,
    ) -> Result<Self> {
        if service_duration_minutes == 0 {
            return Err(SlotError::InvalidDuration(service_duration_minutes));
        }
        for booking in &existing {
            booking.validate()?;
        }
        Ok(Self {
            date,
            service_duration_minutes,
            existing,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn service_duration_minutes(&self) -> u32 {
        self.service_duration_minutes
    }

    pub fn existing(&self) -> &[BookedInterval] {
        &self.existing
    }

    fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.service_duration_minutes))
    }
}

/// A start time at which the requested service fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_time(self.start))
    }
}

/// Why a candidate start time was dropped.
#[derive(Debug, Clone, Copy)]
enum Rejection {
    OutsideHours,
    CrossesBreak,
    Overlaps(NaiveDateTime),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::OutsideHours => f.write_str("outside business hours"),
            Rejection::CrossesBreak => f.write_str("overlaps break"),
            Rejection::Overlaps(start) => {
                write!(f, "overlaps booking at {}", format_time(start.time()))
            }
        }
    }
}

/// Compute available start times from a raw `YYYY-MM-DD` date string.
///
/// An unparsable date yields an empty list rather than an error. A zero
/// service duration, a zero-length booking, or an invalid schedule are
/// rejected with an error.
///
/// # Errors
/// Returns `SlotError::InvalidDuration`, `SlotError::InvalidBooking` or
/// `SlotError::InvalidSchedule`.
pub fn compute_available_slots(
    schedule: &WeeklySchedule,
    date: &str,
    existing: &[BookedInterval],
    service_duration_minutes: u32,
) -> Result<Vec<Slot>> {
    schedule.validate()?;
    if service_duration_minutes == 0 {
        return Err(SlotError::InvalidDuration(service_duration_minutes));
    }

    let date = match parse_date(date) {
        Ok(date) => date,
        Err(e) => {
            tracing::debug!(error = %e, "unparsable date, no slots");
            return Ok(Vec::new());
        }
    };

    let request = SlotRequest::new(date, service_duration_minutes, existing.to_vec())?;
    Ok(available_slots(schedule, &request))
}

/// Compute available start times for a validated request.
pub fn available_slots(schedule: &WeeklySchedule, request: &SlotRequest) -> Vec<Slot> {
    let date = request.date();
    let weekday = date.weekday();
    let day = schedule.day(weekday);

    if day.is_closed() {
        tracing::debug!(%date, %weekday, "closed day, no slots");
        return Vec::new();
    }
    if schedule.slot_granularity_minutes == 0 {
        tracing::warn!("slot granularity is zero, no slots generated");
        return Vec::new();
    }

    let step = schedule.granularity();
    let duration = request.duration();
    let mut found = BTreeSet::new();

    for interval in &day.open {
        let interval_end = date.and_time(interval.end);
        let mut start = date.and_time(interval.start);

        while start < interval_end {
            // `None` means the end lies past the last representable date.
            let end = match start.checked_add_signed(duration) {
                Some(end) if end.date() == date && end.time() <= interval.end => end,
                _ => {
                    tracing::trace!(
                        candidate = %format_time(start.time()),
                        %interval,
                        "service runs past interval end, sweep stops"
                    );
                    break;
                }
            };

            match check_candidate(schedule, start, end, request.existing()) {
                Ok(()) => {
                    found.insert(Slot {
                        start: start.time(),
                        end: end.time(),
                    });
                }
                Err(reason) => {
                    tracing::trace!(
                        candidate = %format_time(start.time()),
                        %reason,
                        "candidate rejected"
                    );
                }
            }

            match start.checked_add_signed(step) {
                Some(next) => start = next,
                None => break,
            }
        }
    }

    tracing::debug!(%date, %weekday, slots = found.len(), "computed available slots");
    found.into_iter().collect()
}

/// Whether the service can start at `time` on the request's date.
pub fn is_slot_available(
    schedule: &WeeklySchedule,
    request: &SlotRequest,
    time: NaiveTime,
) -> bool {
    available_slots(schedule, request)
        .iter()
        .any(|slot| slot.start == time)
}

fn check_candidate(
    schedule: &WeeklySchedule,
    start: NaiveDateTime,
    end: NaiveDateTime,
    existing: &[BookedInterval],
) -> std::result::Result<(), Rejection> {
    let last_minute = end - Duration::minutes(1);
    if !is_within_business_hours(schedule, start)
        || !is_within_business_hours(schedule, last_minute)
    {
        return Err(Rejection::OutsideHours);
    }

    if schedule
        .day(start.weekday())
        .crosses_break(start.time(), end.time())
    {
        return Err(Rejection::CrossesBreak);
    }

    if let Some(booking) = first_overlap(existing, start, end) {
        return Err(Rejection::Overlaps(booking.start));
    }

    Ok(())
}

//! Entry points for the layers that sit around the engine: the availability
//! lookup and the booking commit check.
//!
//! The service catalog and the booking store are traits so any backing store
//! can be plugged in. The in-memory versions here serve tests and the CLI.
//! Persisting the booking, and doing so under a transaction that re-checks
//! availability, stays with the caller: a slot reported as available is
//! advisory until that commit succeeds.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::booking::BookedInterval;
use crate::error::{Result, SlotError};
use crate::schedule::WeeklySchedule;
use crate::slots::{available_slots, is_slot_available, SlotRequest};
use crate::timefmt::{format_time, parse_date, parse_time};

/// Resolves a service id to its duration.
pub trait ServiceCatalog {
    fn duration_minutes(&self, service_id: u64) -> Option<u32>;
}

/// Supplies the bookings that start on a given date.
pub trait BookingStore {
    fn bookings_on(&self, date: NaiveDate) -> Vec<BookedInterval>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    durations: HashMap<u64, u32>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service(mut self, service_id: u64, duration_minutes: u32) -> Self {
        self.durations.insert(service_id, duration_minutes);
        self
    }
}

impl ServiceCatalog for InMemoryCatalog {
    fn duration_minutes(&self, service_id: u64) -> Option<u32> {
        self.durations.get(&service_id).copied()
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryBookings {
    bookings: Vec<BookedInterval>,
}

impl InMemoryBookings {
    pub fn new(bookings: Vec<BookedInterval>) -> Self {
        Self { bookings }
    }

    pub fn push(&mut self, booking: BookedInterval) {
        self.bookings.push(booking);
    }
}

impl BookingStore for InMemoryBookings {
    fn bookings_on(&self, date: NaiveDate) -> Vec<BookedInterval> {
        self.bookings
            .iter()
            .filter(|b| b.start.date() == date)
            .copied()
            .collect()
    }
}

/// Body of an availability lookup. Both fields are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<String>,
    pub service_id: Option<u64>,
}

/// Answer to an availability lookup: `{"available_slots": ["HH:MM", ...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub available_slots: Vec<String>,
}

/// A requested booking as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub service_id: u64,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
}

/// Answer an availability lookup.
///
/// Unlike [`crate::compute_available_slots`], a malformed date is reported as
/// `SlotError::InvalidDate` so the caller can answer with a client error.
pub fn query_availability<C, S>(
    schedule: &WeeklySchedule,
    catalog: &C,
    store: &S,
    query: &AvailabilityQuery,
) -> Result<AvailabilityResponse>
where
    C: ServiceCatalog + ?Sized,
    S: BookingStore + ?Sized,
{
    let (Some(raw_date), Some(service_id)) = (query.date.as_deref(), query.service_id) else {
        return Err(SlotError::MissingField(if query.date.is_none() {
            "date"
        } else {
            "service_id"
        }));
    };

    let date = parse_date(raw_date)?;
    let request = request_for(catalog, store, service_id, date)?;
    schedule.validate()?;

    let available_slots = available_slots(schedule, &request)
        .iter()
        .map(ToString::to_string)
        .collect();
    Ok(AvailabilityResponse { available_slots })
}

/// Check a booking request against freshly fetched bookings.
///
/// The service is resolved before the date and time are parsed. Returns the
/// booking to commit when the requested start is among the available slots,
/// `SlotError::SlotUnavailable` otherwise.
pub fn validate_booking<C, S>(
    schedule: &WeeklySchedule,
    catalog: &C,
    store: &S,
    booking: &BookingRequest,
) -> Result<BookedInterval>
where
    C: ServiceCatalog + ?Sized,
    S: BookingStore + ?Sized,
{
    let duration = service_duration(catalog, booking.service_id)?;
    let date = parse_date(&booking.date)?;
    let time = parse_time(&booking.time)?;
    let request = SlotRequest::new(date, duration, store.bookings_on(date))?;
    schedule.validate()?;

    if !is_slot_available(schedule, &request, time) {
        tracing::info!(
            %date,
            time = %format_time(time),
            service_id = booking.service_id,
            "requested slot unavailable"
        );
        return Err(SlotError::SlotUnavailable { date, time });
    }

    BookedInterval::new(date.and_time(time), request.service_duration_minutes())
}

fn request_for<C, S>(
    catalog: &C,
    store: &S,
    service_id: u64,
    date: NaiveDate,
) -> Result<SlotRequest>
where
    C: ServiceCatalog + ?Sized,
    S: BookingStore + ?Sized,
{
    let duration = service_duration(catalog, service_id)?;
    SlotRequest::new(date, duration, store.bookings_on(date))
}

fn service_duration<C>(catalog: &C, service_id: u64) -> Result<u32>
where
    C: ServiceCatalog + ?Sized,
{
    catalog
        .duration_minutes(service_id)
        .ok_or(SlotError::UnknownService(service_id))
}

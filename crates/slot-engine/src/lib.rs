//! # slot-engine
//!
//! Deterministic appointment slot availability for a single-resource scheduler.
//!
//! Given a date, a service duration and the bookings already on that date, the
//! engine lists every start time at which the service fits inside the weekly
//! business hours without crossing a break or overlapping a booking. Everything
//! is computed in naive local time, with no I/O and no shared state.
//!
//! ## Quick start
//!
//! ```rust
//! use slot_engine::{compute_available_slots, WeeklySchedule};
//!
//! let schedule = WeeklySchedule::default();
//! let slots = compute_available_slots(&schedule, "2025-10-26", &[], 30).unwrap();
//! assert!(slots.is_empty()); // closed on Sundays
//! ```
//!
//! ## Modules
//!
//! - [`schedule`] — Weekly business hours, break intervals, containment checks
//! - [`booking`] — Existing bookings and the overlap test
//! - [`slots`] — Candidate generation and filtering
//! - [`collaborator`] — Availability lookup and booking validation entry points
//! - [`timefmt`] — `YYYY-MM-DD` / `HH:MM` parsing and serde adapters
//! - [`error`] — Error types

pub mod booking;
pub mod collaborator;
pub mod error;
pub mod schedule;
pub mod slots;
pub mod timefmt;

pub use booking::BookedInterval;
pub use collaborator::{
    query_availability, validate_booking, AvailabilityQuery, AvailabilityResponse,
    BookingRequest, BookingStore, InMemoryBookings, InMemoryCatalog, ServiceCatalog,
};
pub use error::{Result, SlotError};
pub use schedule::{is_within_business_hours, BusinessDay, OpenInterval, WeeklySchedule};
pub use slots::{available_slots, compute_available_slots, is_slot_available, Slot, SlotRequest};

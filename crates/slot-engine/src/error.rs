//! Error types for slot-engine operations.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("Invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid time: {0} (expected HH:MM)")]
    InvalidTime(String),

    #[error("Invalid service duration: {0} minutes (must be positive)")]
    InvalidDuration(u32),

    #[error("Invalid booking: {0}")]
    InvalidBooking(String),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Service not found: {0}")]
    UnknownService(u64),

    #[error("Slot {date} {} is no longer available", .time.format("%H:%M"))]
    SlotUnavailable { date: NaiveDate, time: NaiveTime },
}

impl SlotError {
    /// Status code a web collaborator should answer with for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            SlotError::UnknownService(_) => 404,
            SlotError::SlotUnavailable { .. } => 409,
            SlotError::InvalidSchedule(_) => 500,
            _ => 400,
        }
    }
}

pub type Result<T> = std::result::Result<T, SlotError>;

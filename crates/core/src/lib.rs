//! Scheduling core: working calendars, slot availability and the appointment lifecycle.
//!
//! Storage and catalog access go through the async traits in [`ports`], so everything
//! here can be exercised without a database.

pub mod availability;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod errors;
pub mod interval;
pub mod lifecycle;
pub mod models;
pub mod ports;

pub use availability::AvailabilityEngine;
pub use calendar::ScheduleCalendar;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::BookingConfig;
pub use errors::{BookingError, BookingResult};
pub use lifecycle::AppointmentLifecycleManager;

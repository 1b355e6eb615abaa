//! Seams between the scheduling logic and whatever stores its data.
//!
//! The catalog (specialists, schedules, services) is owned elsewhere and only read here.
//! The appointment store is the system of record and the single shared mutable resource.

use async_trait::async_trait;
use chrono::NaiveDate;
#[cfg(test)]
use mockall::automock;
use uuid::Uuid;

use crate::errors::BookingResult;
use crate::models::{
    appointment::{Appointment, AppointmentStatus, NewAppointment},
    schedule::SpecialistSchedule,
    service::Service,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Catalog: Send + Sync {
    /// `None` when the specialist does not exist.
    async fn specialist_schedule(
        &self,
        specialist_id: i64,
    ) -> BookingResult<Option<SpecialistSchedule>>;

    /// `None` when the service does not exist.
    async fn service(&self, service_id: i64) -> BookingResult<Option<Service>>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn get(&self, id: Uuid) -> BookingResult<Option<Appointment>>;

    /// Pending and confirmed appointments of one specialist on one date.
    async fn list_active_by_date(
        &self,
        specialist_id: i64,
        date: NaiveDate,
    ) -> BookingResult<Vec<Appointment>>;

    /// Pending and confirmed appointments of one specialist over an inclusive date range.
    async fn list_active_in_range(
        &self,
        specialist_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> BookingResult<Vec<Appointment>>;

    /// Confirmed appointments dated on or before `date`, candidates for auto-completion.
    async fn list_confirmed_through(&self, date: NaiveDate) -> BookingResult<Vec<Appointment>>;

    async fn list_by_client(&self, client_id: i64) -> BookingResult<Vec<Appointment>>;

    /// Inserts atomically with the overlap check. Fails with `SlotUnavailable` when an
    /// active appointment of the same specialist and date overlaps the new interval.
    async fn create(&self, appointment: NewAppointment) -> BookingResult<Appointment>;

    /// Applies a status change through the transition table. Fails with `NotFound`
    /// or `InvalidTransition`.
    async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> BookingResult<Appointment>;

    /// Administrative hard delete, outside the lifecycle rules.
    async fn delete(&self, id: Uuid) -> BookingResult<bool>;
}

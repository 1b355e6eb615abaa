//! SQLite implementations of the core storage and catalog ports.

use std::collections::BTreeMap;

use appointly_core::errors::{BookingError, BookingResult};
use appointly_core::models::{
    appointment::{Appointment, AppointmentStatus, NewAppointment},
    schedule::{ScheduleOverride, SpecialistSchedule},
    service::Service,
};
use appointly_core::ports::{AppointmentStore, Catalog};
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::warn;
use uuid::Uuid;

use crate::DbPool;
use crate::models::DbAppointment;
use crate::repositories::{appointment as appointments, catalog};

/// Attempts at a compare-and-set status update before giving up on a row that keeps changing.
const MAX_STATUS_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct SqliteAppointmentStore {
    pool: DbPool,
}

impl SqliteAppointmentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn into_domain(rows: Vec<DbAppointment>) -> BookingResult<Vec<Appointment>> {
    rows.into_iter()
        .map(|row| row.into_domain().map_err(BookingError::from))
        .collect()
}

#[async_trait]
impl AppointmentStore for SqliteAppointmentStore {
    async fn get(&self, id: Uuid) -> BookingResult<Option<Appointment>> {
        match appointments::get_appointment(&self.pool, id).await? {
            Some(row) => Ok(Some(row.into_domain()?)),
            None => Ok(None),
        }
    }

    async fn list_active_by_date(
        &self,
        specialist_id: i64,
        date: NaiveDate,
    ) -> BookingResult<Vec<Appointment>> {
        into_domain(appointments::list_active_by_date(&self.pool, specialist_id, date).await?)
    }

    async fn list_active_in_range(
        &self,
        specialist_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> BookingResult<Vec<Appointment>> {
        into_domain(appointments::list_active_in_range(&self.pool, specialist_id, from, to).await?)
    }

    async fn list_confirmed_through(&self, date: NaiveDate) -> BookingResult<Vec<Appointment>> {
        into_domain(appointments::list_confirmed_through(&self.pool, date).await?)
    }

    async fn list_by_client(&self, client_id: i64) -> BookingResult<Vec<Appointment>> {
        into_domain(appointments::list_by_client(&self.pool, client_id).await?)
    }

    async fn create(&self, appointment: NewAppointment) -> BookingResult<Appointment> {
        match appointments::insert_appointment(&self.pool, &appointment).await {
            Ok(row) => Ok(row.into_domain()?),
            Err(e) if appointments::is_overlap_violation(&e) => {
                warn!(
                    "Overlap guard rejected booking for specialist {} on {}",
                    appointment.specialist_id, appointment.date
                );
                Err(BookingError::SlotUnavailable(format!(
                    "Specialist {} already has an appointment overlapping {}-{} on {}",
                    appointment.specialist_id,
                    appointment.start_time.format("%H:%M"),
                    appointment.end_time.format("%H:%M"),
                    appointment.date
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> BookingResult<Appointment> {
        for _ in 0..MAX_STATUS_ATTEMPTS {
            let current = self
                .get(id)
                .await?
                .ok_or_else(|| {
                    BookingError::NotFound(format!("Appointment with ID {} not found", id))
                })?;
            current.status.transition_to(status)?;

            let updated =
                appointments::update_appointment_status(&self.pool, id, current.status, status)
                    .await;
            match updated {
                Ok(Some(row)) => return Ok(row.into_domain()?),
                // Changed underneath us; re-read and re-check against the new status
                Ok(None) => continue,
                Err(e) if appointments::is_overlap_violation(&e) => {
                    return Err(BookingError::SlotUnavailable(format!(
                        "Appointment {} overlaps another active appointment",
                        id
                    )));
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(BookingError::Storage(eyre::eyre!(
            "Appointment {} kept changing during status update",
            id
        )))
    }

    async fn delete(&self, id: Uuid) -> BookingResult<bool> {
        Ok(appointments::delete_appointment(&self.pool, id).await?)
    }
}

#[derive(Clone)]
pub struct SqliteCatalog {
    pool: DbPool,
}

impl SqliteCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Catalog for SqliteCatalog {
    async fn specialist_schedule(
        &self,
        specialist_id: i64,
    ) -> BookingResult<Option<SpecialistSchedule>> {
        if catalog::get_specialist(&self.pool, specialist_id).await?.is_none() {
            return Ok(None);
        }

        let weekly = catalog::list_schedule_entries(&self.pool, specialist_id)
            .await?
            .into_iter()
            .map(|row| row.into_domain())
            .collect::<eyre::Result<Vec<_>>>()?;

        let mut by_date: BTreeMap<NaiveDate, ScheduleOverride> = BTreeMap::new();
        for row in catalog::list_schedule_overrides(&self.pool, specialist_id).await? {
            let window = row.window()?;
            let day = by_date.entry(row.date).or_insert_with(|| ScheduleOverride {
                date: row.date,
                windows: Vec::new(),
            });
            day.windows.extend(window);
        }

        Ok(Some(SpecialistSchedule {
            specialist_id,
            weekly,
            overrides: by_date.into_values().collect(),
        }))
    }

    async fn service(&self, service_id: i64) -> BookingResult<Option<Service>> {
        match catalog::get_service(&self.pool, service_id).await? {
            Some(row) => Ok(Some(row.into_domain()?)),
            None => Ok(None),
        }
    }
}

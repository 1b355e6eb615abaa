//! # Appointment Lifecycle
//!
//! Creates appointments and moves them through their statuses. The availability check
//! done here before writing is advisory. The store's atomic overlap guard has the final
//! word, so a concurrent booking of the same interval still fails with `SlotUnavailable`.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::availability::AvailabilityEngine;
use crate::errors::{BookingError, BookingResult};
use crate::models::appointment::{
    Appointment, AppointmentStatus, AutoCompleteFailure, AutoCompleteReport, BookAppointmentRequest,
    NewAppointment,
};
use crate::models::time_slot::{TimeSlot, add_minutes, parse_hhmm};
use crate::ports::AppointmentStore;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(value: &str) -> BookingResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| {
            BookingError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", value))
        })
}

pub struct AppointmentLifecycleManager {
    engine: Arc<AvailabilityEngine>,
    store: Arc<dyn AppointmentStore>,
}

impl AppointmentLifecycleManager {
    pub fn new(engine: Arc<AvailabilityEngine>, store: Arc<dyn AppointmentStore>) -> Self {
        Self { engine, store }
    }

    /// Books the slot starting at `start_time` for the service's full duration.
    pub async fn book(&self, request: BookAppointmentRequest) -> BookingResult<Appointment> {
        let date = parse_date(&request.date)?;
        let start = parse_hhmm(&request.start_time)?;

        let service = self.engine.bookable_service(request.service_id).await?;
        let end = add_minutes(start, i64::from(service.duration_minutes)).ok_or_else(|| {
            BookingError::Validation(format!(
                "A {} minute appointment starting at {} would end after midnight",
                service.duration_minutes, request.start_time
            ))
        })?;
        let slot = TimeSlot::new(start, end);

        self.engine
            .verify_slot_free(request.specialist_id, date, slot)
            .await?;

        let appointment = self
            .store
            .create(NewAppointment {
                specialist_id: request.specialist_id,
                service_id: service.id,
                client_id: request.client_id,
                date,
                start_time: start,
                end_time: end,
                status: self.engine.config().initial_status,
            })
            .await?;

        info!(
            "Booked appointment {} for client {} with specialist {} on {} at {}",
            appointment.id,
            appointment.client_id,
            appointment.specialist_id,
            appointment.date,
            request.start_time
        );
        Ok(appointment)
    }

    /// Cancels on behalf of the client who owns the appointment.
    pub async fn cancel(&self, id: Uuid, acting_user_id: i64) -> BookingResult<Appointment> {
        let appointment = self.require(id).await?;

        if appointment.client_id != acting_user_id {
            warn!(
                "User {} tried to cancel appointment {} owned by client {}",
                acting_user_id, id, appointment.client_id
            );
            return Err(BookingError::Authorization(format!(
                "User {} cannot cancel appointment {}",
                acting_user_id, id
            )));
        }

        let cancelled = self.transition(appointment, AppointmentStatus::Cancelled).await?;
        info!("Appointment {} cancelled by client {}", id, acting_user_id);
        Ok(cancelled)
    }

    /// Administrative status change. Still bound by the transition table.
    pub async fn set_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> BookingResult<Appointment> {
        let appointment = self.require(id).await?;
        let updated = self.transition(appointment, status).await?;
        info!("Appointment {} moved to {}", id, status);
        Ok(updated)
    }

    /// Completes every confirmed appointment whose end has already passed.
    ///
    /// Individual failures are recorded in the report and do not stop the batch.
    pub async fn auto_complete_past(&self) -> BookingResult<AutoCompleteReport> {
        let now = self.engine.now();
        let candidates = self.store.list_confirmed_through(now.date()).await?;

        let mut report = AutoCompleteReport::default();
        for appointment in candidates
            .into_iter()
            .filter(|a| a.status == AppointmentStatus::Confirmed && a.ends_at() < now)
        {
            match self
                .store
                .update_status(appointment.id, AppointmentStatus::Completed)
                .await
            {
                Ok(updated) => report.completed.push(updated.id),
                Err(e) => {
                    warn!("Failed to auto-complete appointment {}: {}", appointment.id, e);
                    report.failed.push(AutoCompleteFailure {
                        id: appointment.id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if report.completed.is_empty() && report.failed.is_empty() {
            debug!("No past appointments to auto-complete");
        } else {
            info!(
                "Auto-completed {} appointment(s), {} failure(s)",
                report.completed.len(),
                report.failed.len()
            );
        }
        Ok(report)
    }

    pub async fn get(&self, id: Uuid) -> BookingResult<Appointment> {
        self.require(id).await
    }

    pub async fn list_for_client(&self, client_id: i64) -> BookingResult<Vec<Appointment>> {
        let mut appointments = self.store.list_by_client(client_id).await?;
        appointments.sort_by_key(|a| (a.date, a.start_time));
        Ok(appointments)
    }

    /// Hard delete, bypassing the lifecycle. Returns whether a row was removed.
    pub async fn delete(&self, id: Uuid) -> BookingResult<bool> {
        let deleted = self.store.delete(id).await?;
        if deleted {
            info!("Appointment {} deleted", id);
        }
        Ok(deleted)
    }

    async fn require(&self, id: Uuid) -> BookingResult<Appointment> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Appointment with ID {} not found", id)))
    }

    async fn transition(
        &self,
        appointment: Appointment,
        next: AppointmentStatus,
    ) -> BookingResult<Appointment> {
        if let Err(e) = appointment.status.transition_to(next) {
            warn!("Rejected transition for appointment {}: {}", appointment.id, e);
            return Err(e);
        }
        self.store.update_status(appointment.id, next).await
    }
}

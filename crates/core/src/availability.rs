//! # Availability Engine
//!
//! Computes which dates and time slots a specialist can still take for a given service.
//!
//! ## Algorithm
//!
//! 1. Resolve the service; archived or unknown services fail early
//! 2. Resolve the specialist's working windows for the date (merged, overrides applied)
//! 3. Load the active appointments for the date and subtract them from the windows
//! 4. Step through each free sub-window at the configured granularity, keeping every
//!    slot of the service's duration that fits entirely inside it
//! 5. Drop anything that does not start after the current moment
//!
//! Reads here are not transactional. A slightly stale answer is acceptable because
//! booking re-checks the slot against the store before writing.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::calendar::{ScheduleCalendar, windows_for_date};
use crate::clock::Clock;
use crate::config::BookingConfig;
use crate::errors::{BookingError, BookingResult};
use crate::interval::{slots_within, subtract};
use crate::models::{appointment::Appointment, service::Service, time_slot::TimeSlot};
use crate::ports::{AppointmentStore, Catalog};

pub struct AvailabilityEngine {
    calendar: ScheduleCalendar,
    catalog: Arc<dyn Catalog>,
    store: Arc<dyn AppointmentStore>,
    clock: Arc<dyn Clock>,
    config: BookingConfig,
}

impl AvailabilityEngine {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        store: Arc<dyn AppointmentStore>,
        clock: Arc<dyn Clock>,
        config: BookingConfig,
    ) -> Self {
        Self {
            calendar: ScheduleCalendar::new(catalog.clone()),
            catalog,
            store,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &BookingConfig {
        &self.config
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Looks up a service that can currently be booked.
    pub async fn bookable_service(&self, service_id: i64) -> BookingResult<Service> {
        let service = self
            .catalog
            .service(service_id)
            .await?
            .ok_or_else(|| {
                BookingError::NotFound(format!("Service with ID {} not found", service_id))
            })?;

        if service.is_archived {
            return Err(BookingError::ServiceArchived(service_id));
        }
        if service.duration_minutes == 0 {
            return Err(BookingError::Validation(format!(
                "Service {} has no duration",
                service_id
            )));
        }
        Ok(service)
    }

    /// Free slots for one date, ordered by start time.
    pub async fn available_slots(
        &self,
        specialist_id: i64,
        service_id: i64,
        date: NaiveDate,
    ) -> BookingResult<Vec<TimeSlot>> {
        let service = self.bookable_service(service_id).await?;
        let schedule = self.calendar.schedule(specialist_id).await?;
        let now = self.clock.now();

        if date < now.date() {
            return Ok(Vec::new());
        }

        let windows = windows_for_date(&schedule, date);
        if windows.is_empty() {
            return Ok(Vec::new());
        }

        let occupied = self.store.list_active_by_date(specialist_id, date).await?;
        let slots = self.slots_for_day(&windows, &occupied, service.duration_minutes, date, now);

        debug!(
            "Specialist {} has {} free slot(s) for service {} on {}",
            specialist_id,
            slots.len(),
            service_id,
            date
        );
        Ok(slots)
    }

    /// Dates in `[from, to]` that have at least one free slot.
    pub async fn available_dates(
        &self,
        specialist_id: i64,
        service_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> BookingResult<BTreeSet<NaiveDate>> {
        if from > to {
            return Err(BookingError::Validation(format!(
                "Range start {} is after range end {}",
                from, to
            )));
        }
        let span_days = (to - from).num_days() + 1;
        if span_days > i64::from(self.config.max_date_range_days) {
            return Err(BookingError::Validation(format!(
                "Date range of {} days exceeds the maximum of {}",
                span_days, self.config.max_date_range_days
            )));
        }

        let service = self.bookable_service(service_id).await?;
        let schedule = self.calendar.schedule(specialist_id).await?;
        let now = self.clock.now();

        let first = from.max(now.date());
        let mut dates = BTreeSet::new();
        if first > to {
            return Ok(dates);
        }

        let mut by_date: HashMap<NaiveDate, Vec<Appointment>> = HashMap::new();
        for appointment in self.store.list_active_in_range(specialist_id, first, to).await? {
            by_date.entry(appointment.date).or_default().push(appointment);
        }

        for date in first.iter_days().take_while(|d| *d <= to) {
            let windows = windows_for_date(&schedule, date);
            if windows.is_empty() {
                continue;
            }
            let occupied = by_date.get(&date).map(Vec::as_slice).unwrap_or_default();
            if !self
                .slots_for_day(&windows, occupied, service.duration_minutes, date, now)
                .is_empty()
            {
                dates.insert(date);
            }
        }

        debug!(
            "Specialist {} has {} available date(s) for service {} between {} and {}",
            specialist_id,
            dates.len(),
            service_id,
            from,
            to
        );
        Ok(dates)
    }

    /// Confirms that `slot` on `date` could be booked right now: it starts after the
    /// current moment, sits inside one working window and overlaps no active appointment.
    pub async fn verify_slot_free(
        &self,
        specialist_id: i64,
        date: NaiveDate,
        slot: TimeSlot,
    ) -> BookingResult<()> {
        if date.and_time(slot.start) <= self.clock.now() {
            return Err(BookingError::SlotUnavailable(format!(
                "{} {} is in the past",
                date,
                slot.start.format("%H:%M")
            )));
        }

        let windows = self.calendar.working_windows(specialist_id, date).await?;
        if !windows.iter().any(|w| w.start <= slot.start && slot.end <= w.end) {
            return Err(BookingError::SlotUnavailable(format!(
                "{}-{} on {} is outside working hours",
                slot.start.format("%H:%M"),
                slot.end.format("%H:%M"),
                date
            )));
        }

        let occupied = self.store.list_active_by_date(specialist_id, date).await?;
        if occupied.iter().any(|a| a.status.is_active() && a.overlaps(&slot)) {
            return Err(BookingError::SlotUnavailable(format!(
                "{}-{} on {} is already taken",
                slot.start.format("%H:%M"),
                slot.end.format("%H:%M"),
                date
            )));
        }
        Ok(())
    }

    fn slots_for_day(
        &self,
        windows: &[TimeSlot],
        occupied: &[Appointment],
        duration_minutes: u32,
        date: NaiveDate,
        now: NaiveDateTime,
    ) -> Vec<TimeSlot> {
        if date < now.date() {
            return Vec::new();
        }

        let busy: Vec<TimeSlot> = occupied
            .iter()
            .filter(|a| a.date == date && a.status.is_active())
            .map(Appointment::slot)
            .collect();
        let free = subtract(windows, &busy);
        let mut slots = slots_within(&free, duration_minutes, self.config.slot_step_minutes);

        if date == now.date() {
            let cutoff = now.time();
            slots.retain(|s| s.start > cutoff);
        }
        slots
    }
}

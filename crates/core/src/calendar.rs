use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::errors::{BookingError, BookingResult};
use crate::interval::merge_overlapping;
use crate::models::schedule::SpecialistSchedule;
use crate::models::time_slot::TimeSlot;
use crate::ports::Catalog;

/// Working windows of a schedule on one date, merged and sorted.
///
/// A date-specific override replaces the weekly entries for that date entirely.
pub fn windows_for_date(schedule: &SpecialistSchedule, date: NaiveDate) -> Vec<TimeSlot> {
    let windows = match schedule.override_for(date) {
        Some(day) => day.windows.clone(),
        None => schedule
            .weekly
            .iter()
            .filter(|entry| entry.applies_to(date))
            .map(|entry| entry.window())
            .collect(),
    };
    merge_overlapping(windows)
}

pub struct ScheduleCalendar {
    catalog: Arc<dyn Catalog>,
}

impl ScheduleCalendar {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    pub async fn schedule(&self, specialist_id: i64) -> BookingResult<SpecialistSchedule> {
        self.catalog
            .specialist_schedule(specialist_id)
            .await?
            .ok_or_else(|| {
                BookingError::NotFound(format!("Specialist with ID {} not found", specialist_id))
            })
    }

    /// An empty result is a non-working day, not an error.
    pub async fn working_windows(
        &self,
        specialist_id: i64,
        date: NaiveDate,
    ) -> BookingResult<Vec<TimeSlot>> {
        let schedule = self.schedule(specialist_id).await?;
        let windows = windows_for_date(&schedule, date);
        debug!(
            "Specialist {} has {} working window(s) on {}",
            specialist_id,
            windows.len(),
            date
        );
        Ok(windows)
    }
}

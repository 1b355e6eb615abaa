use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::{BookingError, BookingResult};
use crate::models::time_slot::{TimeSlot, hhmm};

/// One recurring weekly working interval. `day_of_week` runs 1 (Monday) to 7 (Sunday).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub day_of_week: u8,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

impl ScheduleEntry {
    pub fn new(day_of_week: u8, start_time: NaiveTime, end_time: NaiveTime) -> BookingResult<Self> {
        if !(1..=7).contains(&day_of_week) {
            return Err(BookingError::Validation(format!(
                "Day of week must be between 1 and 7, got {}",
                day_of_week
            )));
        }
        if start_time >= end_time {
            return Err(BookingError::Validation(format!(
                "Schedule entry must end after it starts ({} - {})",
                start_time, end_time
            )));
        }
        Ok(Self {
            day_of_week,
            start_time,
            end_time,
        })
    }

    pub fn applies_to(&self, date: NaiveDate) -> bool {
        date.weekday().number_from_monday() == u32::from(self.day_of_week)
    }

    pub fn window(&self) -> TimeSlot {
        TimeSlot::new(self.start_time, self.end_time)
    }
}

/// Replaces the weekly windows for one date. No windows means a day off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleOverride {
    pub date: NaiveDate,
    pub windows: Vec<TimeSlot>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialistSchedule {
    pub specialist_id: i64,
    pub weekly: Vec<ScheduleEntry>,
    #[serde(default)]
    pub overrides: Vec<ScheduleOverride>,
}

impl SpecialistSchedule {
    pub fn override_for(&self, date: NaiveDate) -> Option<&ScheduleOverride> {
        self.overrides.iter().find(|o| o.date == date)
    }
}

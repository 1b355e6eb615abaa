use appointly_core::models::{
    appointment::{Appointment, AppointmentStatus},
    schedule::ScheduleEntry,
    service::Service,
    time_slot::{TimeSlot, parse_hhmm},
};
use chrono::{DateTime, NaiveDate, Utc};
use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSpecialist {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbScheduleEntry {
    pub specialist_id: i64,
    pub day_of_week: i64,
    pub start_time: String,
    pub end_time: String,
}

impl DbScheduleEntry {
    pub fn into_domain(self) -> Result<ScheduleEntry> {
        let day = u8::try_from(self.day_of_week)
            .map_err(|_| eyre!("Stored day of week {} is out of range", self.day_of_week))?;
        Ok(ScheduleEntry::new(
            day,
            parse_hhmm(&self.start_time)?,
            parse_hhmm(&self.end_time)?,
        )?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbScheduleOverride {
    pub specialist_id: i64,
    pub date: NaiveDate,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl DbScheduleOverride {
    /// `None` for a day-off marker row.
    pub fn window(&self) -> Result<Option<TimeSlot>> {
        match (&self.start_time, &self.end_time) {
            (Some(start), Some(end)) => {
                Ok(Some(TimeSlot::new(parse_hhmm(start)?, parse_hhmm(end)?)))
            }
            (None, None) => Ok(None),
            _ => Err(eyre!(
                "Override for specialist {} on {} has only one bound",
                self.specialist_id,
                self.date
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbService {
    pub id: i64,
    pub name: String,
    pub duration_minutes: i64,
    pub is_archived: bool,
}

impl DbService {
    pub fn into_domain(self) -> Result<Service> {
        let duration_minutes = u32::try_from(self.duration_minutes)
            .map_err(|_| {
                eyre!("Service {} has invalid duration {}", self.id, self.duration_minutes)
            })?;
        Ok(Service {
            id: self.id,
            name: self.name,
            duration_minutes,
            is_archived: self.is_archived,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub specialist_id: i64,
    pub service_id: i64,
    pub client_id: i64,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbAppointment {
    pub fn into_domain(self) -> Result<Appointment> {
        Ok(Appointment {
            id: self.id,
            specialist_id: self.specialist_id,
            service_id: self.service_id,
            client_id: self.client_id,
            date: self.date,
            start_time: parse_hhmm(&self.start_time)?,
            end_time: parse_hhmm(&self.end_time)?,
            status: self.status.parse::<AppointmentStatus>()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

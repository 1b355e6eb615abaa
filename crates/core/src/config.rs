use crate::errors::{BookingError, BookingResult};
use crate::models::appointment::AppointmentStatus;

pub const DEFAULT_SLOT_STEP_MINUTES: u32 = 30;
pub const DEFAULT_MAX_DATE_RANGE_DAYS: u32 = 92;

/// Tunables shared by the availability engine and the lifecycle manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingConfig {
    /// Distance between candidate slot starts inside a free window
    pub slot_step_minutes: u32,
    /// Status a freshly booked appointment starts in
    pub initial_status: AppointmentStatus,
    /// Longest range accepted by an available-dates query
    pub max_date_range_days: u32,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            slot_step_minutes: DEFAULT_SLOT_STEP_MINUTES,
            initial_status: AppointmentStatus::Pending,
            max_date_range_days: DEFAULT_MAX_DATE_RANGE_DAYS,
        }
    }
}

impl BookingConfig {
    pub fn new(
        slot_step_minutes: u32,
        initial_status: AppointmentStatus,
        max_date_range_days: u32,
    ) -> BookingResult<Self> {
        let config = Self {
            slot_step_minutes,
            initial_status,
            max_date_range_days,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> BookingResult<()> {
        if self.slot_step_minutes == 0 || self.slot_step_minutes > 24 * 60 {
            return Err(BookingError::Validation(format!(
                "Slot step must be between 1 and 1440 minutes, got {}",
                self.slot_step_minutes
            )));
        }
        if !self.initial_status.is_active() {
            return Err(BookingError::Validation(format!(
                "Initial status must be pending or confirmed, got {}",
                self.initial_status
            )));
        }
        if self.max_date_range_days == 0 {
            return Err(BookingError::Validation(
                "Maximum date range must be at least one day".to_string(),
            ));
        }
        Ok(())
    }
}

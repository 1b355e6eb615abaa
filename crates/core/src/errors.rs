use thiserror::Error;

use crate::models::appointment::AppointmentStatus;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Service {0} is archived and cannot be booked")]
    ServiceArchived(i64),

    #[error("Slot unavailable: {0}")]
    SlotUnavailable(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Storage error: {0}")]
    Storage(#[from] eyre::Report),
}

impl BookingError {
    /// Stable identifier callers can branch on without parsing messages.
    pub fn code(&self) -> &'static str {
        match self {
            BookingError::NotFound(_) => "not_found",
            BookingError::ServiceArchived(_) => "service_archived",
            BookingError::SlotUnavailable(_) => "slot_unavailable",
            BookingError::InvalidTransition { .. } => "invalid_transition",
            BookingError::Validation(_) => "validation_error",
            BookingError::Authorization(_) => "forbidden",
            BookingError::Storage(_) => "storage_failure",
        }
    }
}

pub type BookingResult<T> = Result<T, BookingError>;

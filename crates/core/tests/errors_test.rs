use std::error::Error;

use appointly_core::errors::{BookingError, BookingResult};
use appointly_core::models::appointment::AppointmentStatus;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_booking_error_display() {
    let not_found = BookingError::NotFound("Appointment missing".to_string());
    let archived = BookingError::ServiceArchived(4);
    let unavailable =
        BookingError::SlotUnavailable("10:00-10:30 on 2026-10-19 is already taken".to_string());
    let transition = BookingError::InvalidTransition {
        from: AppointmentStatus::Completed,
        to: AppointmentStatus::Cancelled,
    };
    let validation = BookingError::Validation("Invalid input".to_string());
    let authorization = BookingError::Authorization("Not your appointment".to_string());
    let storage = BookingError::Storage(eyre::eyre!("Database connection failed"));

    assert_eq!(not_found.to_string(), "Resource not found: Appointment missing");
    assert_eq!(archived.to_string(), "Service 4 is archived and cannot be booked");
    assert_eq!(
        unavailable.to_string(),
        "Slot unavailable: 10:00-10:30 on 2026-10-19 is already taken"
    );
    assert_eq!(
        transition.to_string(),
        "Invalid status transition from completed to cancelled"
    );
    assert_eq!(validation.to_string(), "Validation error: Invalid input");
    assert_eq!(authorization.to_string(), "Authorization error: Not your appointment");
    assert!(storage.to_string().contains("Storage error:"));
}

#[rstest]
#[case(BookingError::NotFound("x".to_string()), "not_found")]
#[case(BookingError::ServiceArchived(1), "service_archived")]
#[case(BookingError::SlotUnavailable("x".to_string()), "slot_unavailable")]
#[case(
    BookingError::InvalidTransition {
        from: AppointmentStatus::Cancelled,
        to: AppointmentStatus::Pending,
    },
    "invalid_transition"
)]
#[case(BookingError::Validation("x".to_string()), "validation_error")]
#[case(BookingError::Authorization("x".to_string()), "forbidden")]
#[case(BookingError::Storage(eyre::eyre!("x")), "storage_failure")]
fn test_error_codes(#[case] error: BookingError, #[case] code: &str) {
    assert_eq!(error.code(), code);
}

#[test]
fn test_from_eyre_report() {
    let report = eyre::eyre!("disk I/O error");
    let error: BookingError = report.into();

    assert!(matches!(error, BookingError::Storage(_)));
    assert!(error.to_string().contains("disk I/O error"));
    assert!(error.source().is_some());
}

#[test]
fn test_booking_result() {
    let result: BookingResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: BookingResult<i32> = Err(BookingError::NotFound("Not found".to_string()));
    assert!(result.is_err());
}

use appointly_core::config::BookingConfig;
use appointly_core::errors::BookingError;
use appointly_core::models::{
    appointment::{Appointment, AppointmentStatus, AutoCompleteReport, BookAppointmentRequest},
    schedule::{ScheduleEntry, SpecialistSchedule},
    time_slot::{TimeSlot, add_minutes, format_hhmm, parse_hhmm},
};
use chrono::{NaiveDate, NaiveTime, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{from_str, json, to_value};
use uuid::Uuid;

fn t(value: &str) -> NaiveTime {
    parse_hhmm(value).expect("valid time")
}

#[rstest]
#[case(AppointmentStatus::Pending, AppointmentStatus::Confirmed, true)]
#[case(AppointmentStatus::Pending, AppointmentStatus::Cancelled, true)]
#[case(AppointmentStatus::Pending, AppointmentStatus::Completed, false)]
#[case(AppointmentStatus::Pending, AppointmentStatus::Pending, false)]
#[case(AppointmentStatus::Confirmed, AppointmentStatus::Completed, true)]
#[case(AppointmentStatus::Confirmed, AppointmentStatus::Cancelled, true)]
#[case(AppointmentStatus::Confirmed, AppointmentStatus::Pending, false)]
#[case(AppointmentStatus::Completed, AppointmentStatus::Cancelled, false)]
#[case(AppointmentStatus::Completed, AppointmentStatus::Confirmed, false)]
#[case(AppointmentStatus::Cancelled, AppointmentStatus::Pending, false)]
#[case(AppointmentStatus::Cancelled, AppointmentStatus::Confirmed, false)]
fn test_transition_table(
    #[case] from: AppointmentStatus,
    #[case] to: AppointmentStatus,
    #[case] allowed: bool,
) {
    assert_eq!(from.can_transition_to(to), allowed);
    assert_eq!(from.transition_to(to).is_ok(), allowed);
}

#[test]
fn test_terminal_statuses_reject_everything() {
    for from in [AppointmentStatus::Completed, AppointmentStatus::Cancelled] {
        assert!(from.is_terminal());
        for to in AppointmentStatus::ALL {
            assert!(matches!(
                from.transition_to(to),
                Err(BookingError::InvalidTransition { .. })
            ));
        }
    }
}

#[rstest]
#[case("pending", AppointmentStatus::Pending)]
#[case("Confirmed", AppointmentStatus::Confirmed)]
#[case(" completed ", AppointmentStatus::Completed)]
#[case("cancelled", AppointmentStatus::Cancelled)]
fn test_status_from_str(#[case] raw: &str, #[case] expected: AppointmentStatus) {
    assert_eq!(raw.parse::<AppointmentStatus>().unwrap(), expected);
}

#[test]
fn test_status_from_str_rejects_unknown() {
    assert!(matches!(
        "no_show".parse::<AppointmentStatus>(),
        Err(BookingError::Validation(_))
    ));
}

#[rstest]
#[case("09:00", true)]
#[case("23:59", true)]
#[case("9:00", false)]
#[case("24:00", false)]
#[case("09:60", false)]
#[case("0900", false)]
fn test_parse_hhmm(#[case] raw: &str, #[case] valid: bool) {
    assert_eq!(parse_hhmm(raw).is_ok(), valid);
}

#[test]
fn test_add_minutes_stops_at_midnight() {
    assert_eq!(add_minutes(t("23:00"), 30), Some(t("23:30")));
    assert_eq!(add_minutes(t("23:30"), 30), None);
    assert_eq!(add_minutes(t("23:45"), 30), None);
    assert_eq!(format_hhmm(t("07:05")), "07:05");
}

#[test]
fn test_time_slot_serializes_as_hhmm() {
    let slot = TimeSlot::new(t("10:00"), t("10:30"));

    let value = to_value(slot).expect("Failed to serialize slot");

    assert_eq!(value, json!({"start": "10:00", "end": "10:30"}));
}

#[test]
fn test_appointment_serialization() {
    let appointment = Appointment {
        id: Uuid::new_v4(),
        specialist_id: 3,
        service_id: 8,
        client_id: 42,
        date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        start_time: t("10:00"),
        end_time: t("10:45"),
        status: AppointmentStatus::Confirmed,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let value = to_value(&appointment).expect("Failed to serialize appointment");
    assert_eq!(value["date"], "2026-10-19");
    assert_eq!(value["start_time"], "10:00");
    assert_eq!(value["end_time"], "10:45");
    assert_eq!(value["status"], "confirmed");

    let back: Appointment =
        serde_json::from_value(value).expect("Failed to deserialize appointment");
    assert_eq!(back, appointment);
}

#[test]
fn test_book_request_deserialization() {
    let request: BookAppointmentRequest = from_str(
        r#"{"specialist_id":1,"service_id":2,"client_id":3,"date":"2026-10-19","start_time":"10:00"}"#,
    )
    .expect("Failed to deserialize request");

    assert_eq!(request.specialist_id, 1);
    assert_eq!(request.date, "2026-10-19");
    assert_eq!(request.start_time, "10:00");
}

#[rstest]
#[case(0, 9, 0, 10, 0)]
#[case(8, 9, 0, 10, 0)]
#[case(1, 10, 0, 9, 0)]
#[case(1, 10, 0, 10, 0)]
fn test_schedule_entry_rejects_invalid(
    #[case] day: u8,
    #[case] start_h: u32,
    #[case] start_m: u32,
    #[case] end_h: u32,
    #[case] end_m: u32,
) {
    let result = ScheduleEntry::new(
        day,
        NaiveTime::from_hms_opt(start_h, start_m, 0).unwrap(),
        NaiveTime::from_hms_opt(end_h, end_m, 0).unwrap(),
    );
    assert!(matches!(result, Err(BookingError::Validation(_))));
}

#[test]
fn test_schedule_without_overrides_deserializes() {
    let schedule: SpecialistSchedule = from_str(
        r#"{"specialist_id":5,"weekly":[{"day_of_week":2,"start_time":"09:00","end_time":"17:00"}]}"#,
    )
    .expect("Failed to deserialize schedule");

    assert_eq!(schedule.weekly.len(), 1);
    assert!(schedule.overrides.is_empty());
    assert!(schedule.weekly[0].applies_to(NaiveDate::from_ymd_opt(2026, 10, 20).unwrap()));
}

#[test]
fn test_booking_config_validation() {
    assert!(BookingConfig::default().validate().is_ok());
    assert!(BookingConfig::new(15, AppointmentStatus::Confirmed, 30).is_ok());
    assert!(BookingConfig::new(0, AppointmentStatus::Pending, 30).is_err());
    assert!(BookingConfig::new(30, AppointmentStatus::Completed, 30).is_err());
    assert!(BookingConfig::new(30, AppointmentStatus::Pending, 0).is_err());
}

#[test]
fn test_empty_report_serialization() {
    let value = to_value(AutoCompleteReport::default()).unwrap();
    assert_eq!(value, json!({"completed": [], "failed": []}));
}

//! Races many bookings against one specialist's day and checks that no two active
//! appointments ever overlap.

use std::sync::Arc;

use appointly_core::models::appointment::{
    Appointment, AppointmentStatus, BookAppointmentRequest, NewAppointment,
};
use appointly_core::models::schedule::ScheduleEntry;
use appointly_core::models::time_slot::{add_minutes, format_hhmm, parse_hhmm};
use appointly_core::ports::AppointmentStore;
use appointly_core::{
    AppointmentLifecycleManager, AvailabilityEngine, BookingConfig, BookingError, FixedClock,
};
use appointly_db::repositories::catalog;
use appointly_db::{DbPool, SqliteAppointmentStore, SqliteCatalog, create_pool, schema};
use chrono::{NaiveDate, NaiveTime};
use rand::Rng;
use tempfile::TempDir;

const SPECIALIST: i64 = 1;
const SHORT: i64 = 10;
const LONG: i64 = 11;

fn t(value: &str) -> NaiveTime {
    parse_hhmm(value).unwrap()
}

// 2030-01-07 is a Monday
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 1, 7).unwrap()
}

async fn file_pool() -> (TempDir, DbPool) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite://{}", dir.path().join("appointly.db").display());
    let pool = create_pool(&url).await.expect("Failed to open database");
    schema::initialize_database(&pool).await.expect("Failed to initialize schema");

    catalog::upsert_specialist(&pool, SPECIALIST, "Anna").await.unwrap();
    catalog::replace_weekly_schedule(
        &pool,
        SPECIALIST,
        &[ScheduleEntry::new(1, t("09:00"), t("13:00")).unwrap()],
    )
    .await
    .unwrap();
    catalog::upsert_service(&pool, SHORT, "Express manicure", 30).await.unwrap();
    catalog::upsert_service(&pool, LONG, "Manicure", 45).await.unwrap();

    (dir, pool)
}

fn assert_no_overlaps(appointments: &[Appointment]) {
    for (i, a) in appointments.iter().enumerate() {
        for b in &appointments[i + 1..] {
            assert!(
                !a.overlaps(&b.slot()),
                "{}-{} overlaps {}-{}",
                format_hhmm(a.start_time),
                format_hhmm(a.end_time),
                format_hhmm(b.start_time),
                format_hhmm(b.end_time)
            );
        }
    }
}

#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 4))]
async fn test_concurrent_bookings_never_double_book() {
    let (_dir, pool) = file_pool().await;
    let store: Arc<dyn AppointmentStore> = Arc::new(SqliteAppointmentStore::new(pool.clone()));
    let engine = Arc::new(AvailabilityEngine::new(
        Arc::new(SqliteCatalog::new(pool.clone())),
        store.clone(),
        Arc::new(FixedClock(monday().pred_opt().unwrap().and_time(t("12:00")))),
        BookingConfig::default(),
    ));
    let lifecycle = Arc::new(AppointmentLifecycleManager::new(engine, store.clone()));

    let requests: Vec<BookAppointmentRequest> = {
        let mut rng = rand::thread_rng();
        (0..48)
            .map(|client| {
                let start = add_minutes(t("09:00"), 15 * rng.gen_range(0..14)).unwrap();
                BookAppointmentRequest {
                    specialist_id: SPECIALIST,
                    service_id: if rng.gen_bool(0.5) { SHORT } else { LONG },
                    client_id: client,
                    date: "2030-01-07".to_string(),
                    start_time: format_hhmm(start),
                }
            })
            .collect()
    };

    let handles: Vec<_> = requests
        .into_iter()
        .map(|request| {
            let lifecycle = lifecycle.clone();
            tokio::spawn(async move { lifecycle.book(request).await })
        })
        .collect();

    let mut booked = 0;
    for handle in handles {
        match handle.await.expect("booking task panicked") {
            Ok(_) => booked += 1,
            Err(BookingError::SlotUnavailable(_)) => {}
            Err(e) => panic!("unexpected booking failure: {}", e),
        }
    }

    let active = store.list_active_by_date(SPECIALIST, monday()).await.unwrap();
    assert!(booked > 0);
    assert_eq!(active.len(), booked);
    assert_no_overlaps(&active);
}

#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 4))]
async fn test_identical_inserts_race_to_one_winner() {
    let (_dir, pool) = file_pool().await;
    let store = Arc::new(SqliteAppointmentStore::new(pool));

    let handles: Vec<_> = (0..16)
        .map(|client| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .create(NewAppointment {
                        specialist_id: SPECIALIST,
                        service_id: SHORT,
                        client_id: client,
                        date: monday(),
                        start_time: t("10:00"),
                        end_time: t("10:30"),
                        status: AppointmentStatus::Pending,
                    })
                    .await
            })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        match handle.await.expect("insert task panicked") {
            Ok(_) => winners += 1,
            Err(BookingError::SlotUnavailable(_)) => {}
            Err(e) => panic!("unexpected insert failure: {}", e),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(store.list_active_by_date(SPECIALIST, monday()).await.unwrap().len(), 1);
}

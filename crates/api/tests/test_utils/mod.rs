use std::sync::Arc;

use appointly_api::{ApiState, build_router};
use appointly_core::models::schedule::ScheduleEntry;
use appointly_core::models::time_slot::parse_hhmm;
use appointly_core::{BookingConfig, FixedClock};
use appointly_db::mock::create_test_pool;
use appointly_db::repositories::catalog;
use appointly_db::DbPool;
use axum_test::TestServer;
use chrono::{NaiveDate, NaiveDateTime};

pub const SPECIALIST: i64 = 1;
pub const MANICURE: i64 = 10;
pub const ARCHIVED: i64 = 11;
pub const CLIENT: i64 = 700;

/// 2030-01-07 is a Monday
pub const MONDAY: &str = "2030-01-07";

pub fn at(date: &str, time: &str) -> NaiveDateTime {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap()
        .and_time(parse_hhmm(time).unwrap())
}

/// In-memory database with one specialist working Monday 09:00-12:00, a 30 minute
/// service and an archived one.
pub async fn seeded_pool() -> DbPool {
    let pool = create_test_pool().await.expect("Failed to create test pool");

    catalog::upsert_specialist(&pool, SPECIALIST, "Anna").await.unwrap();
    catalog::replace_weekly_schedule(
        &pool,
        SPECIALIST,
        &[
            ScheduleEntry::new(1, parse_hhmm("09:00").unwrap(), parse_hhmm("12:00").unwrap())
                .unwrap(),
        ],
    )
    .await
    .unwrap();
    catalog::upsert_service(&pool, MANICURE, "Manicure", 30).await.unwrap();
    catalog::upsert_service(&pool, ARCHIVED, "Old pedicure", 60).await.unwrap();
    catalog::set_service_archived(&pool, ARCHIVED, true).await.unwrap();

    pool
}

pub fn state_at(pool: &DbPool, now: NaiveDateTime) -> Arc<ApiState> {
    Arc::new(ApiState::new(
        pool.clone(),
        Arc::new(FixedClock(now)),
        BookingConfig::default(),
    ))
}

/// A server over `pool` whose clock is pinned to `now`.
pub fn server_at(pool: &DbPool, now: NaiveDateTime) -> TestServer {
    TestServer::new(build_router(state_at(pool, now))).expect("Failed to start test server")
}

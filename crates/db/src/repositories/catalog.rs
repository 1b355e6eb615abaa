//! Specialists, weekly schedules, date overrides and services.
//!
//! Only reads are needed by the booking flow. The write helpers exist for seeding and
//! administrative tooling.

use appointly_core::models::{
    schedule::ScheduleEntry,
    time_slot::{TimeSlot, format_hhmm},
};
use chrono::{NaiveDate, Utc};
use eyre::{Result, eyre};

use crate::DbPool;
use crate::models::{DbScheduleEntry, DbScheduleOverride, DbService, DbSpecialist};

pub async fn upsert_specialist(pool: &DbPool, id: i64, name: &str) -> Result<DbSpecialist> {
    let specialist = sqlx::query_as::<_, DbSpecialist>(
        r#"
        INSERT INTO specialists (id, name, created_at)
        VALUES (?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET name = excluded.name
        RETURNING id, name, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(specialist)
}

pub async fn get_specialist(pool: &DbPool, id: i64) -> Result<Option<DbSpecialist>> {
    let specialist = sqlx::query_as::<_, DbSpecialist>(
        r#"
        SELECT id, name, created_at FROM specialists WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(specialist)
}

/// Replaces every weekly entry of a specialist.
pub async fn replace_weekly_schedule(
    pool: &DbPool,
    specialist_id: i64,
    entries: &[ScheduleEntry],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM schedule_entries WHERE specialist_id = ?")
        .bind(specialist_id)
        .execute(&mut *tx)
        .await?;

    for entry in entries {
        sqlx::query(
            r#"
            INSERT INTO schedule_entries (specialist_id, day_of_week, start_time, end_time)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(specialist_id)
        .bind(i64::from(entry.day_of_week))
        .bind(format_hhmm(entry.start_time))
        .bind(format_hhmm(entry.end_time))
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::debug!("Stored {} weekly entries for specialist {}", entries.len(), specialist_id);
    Ok(())
}

pub async fn list_schedule_entries(
    pool: &DbPool,
    specialist_id: i64,
) -> Result<Vec<DbScheduleEntry>> {
    let entries = sqlx::query_as::<_, DbScheduleEntry>(
        r#"
        SELECT specialist_id, day_of_week, start_time, end_time
        FROM schedule_entries
        WHERE specialist_id = ?
        ORDER BY day_of_week, start_time
        "#,
    )
    .bind(specialist_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// Sets the windows for one date. An empty list marks the date as a day off.
pub async fn set_schedule_override(
    pool: &DbPool,
    specialist_id: i64,
    date: NaiveDate,
    windows: &[TimeSlot],
) -> Result<()> {
    if let Some(bad) = windows.iter().find(|w| w.start >= w.end) {
        return Err(eyre!(
            "Override window {}-{} must end after it starts",
            format_hhmm(bad.start),
            format_hhmm(bad.end)
        ));
    }

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM schedule_overrides WHERE specialist_id = ? AND date = ?")
        .bind(specialist_id)
        .bind(date)
        .execute(&mut *tx)
        .await?;

    if windows.is_empty() {
        sqlx::query("INSERT INTO schedule_overrides (specialist_id, date) VALUES (?, ?)")
            .bind(specialist_id)
            .bind(date)
            .execute(&mut *tx)
            .await?;
    }
    for window in windows {
        sqlx::query(
            r#"
            INSERT INTO schedule_overrides (specialist_id, date, start_time, end_time)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(specialist_id)
        .bind(date)
        .bind(format_hhmm(window.start))
        .bind(format_hhmm(window.end))
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Drops the override for a date, restoring the weekly windows.
pub async fn clear_schedule_override(
    pool: &DbPool,
    specialist_id: i64,
    date: NaiveDate,
) -> Result<bool> {
    let result = sqlx::query("DELETE FROM schedule_overrides WHERE specialist_id = ? AND date = ?")
        .bind(specialist_id)
        .bind(date)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_schedule_overrides(
    pool: &DbPool,
    specialist_id: i64,
) -> Result<Vec<DbScheduleOverride>> {
    let overrides = sqlx::query_as::<_, DbScheduleOverride>(
        r#"
        SELECT specialist_id, date, start_time, end_time
        FROM schedule_overrides
        WHERE specialist_id = ?
        ORDER BY date, start_time
        "#,
    )
    .bind(specialist_id)
    .fetch_all(pool)
    .await?;

    Ok(overrides)
}

pub async fn upsert_service(
    pool: &DbPool,
    id: i64,
    name: &str,
    duration_minutes: u32,
) -> Result<DbService> {
    let service = sqlx::query_as::<_, DbService>(
        r#"
        INSERT INTO services (id, name, duration_minutes, is_archived)
        VALUES (?, ?, ?, 0)
        ON CONFLICT(id) DO UPDATE SET name = excluded.name, duration_minutes = excluded.duration_minutes
        RETURNING id, name, duration_minutes, is_archived
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(i64::from(duration_minutes))
    .fetch_one(pool)
    .await?;

    Ok(service)
}

pub async fn get_service(pool: &DbPool, id: i64) -> Result<Option<DbService>> {
    let service = sqlx::query_as::<_, DbService>(
        r#"
        SELECT id, name, duration_minutes, is_archived FROM services WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(service)
}

pub async fn set_service_archived(
    pool: &DbPool,
    id: i64,
    archived: bool,
) -> Result<Option<DbService>> {
    let service = sqlx::query_as::<_, DbService>(
        r#"
        UPDATE services SET is_archived = ?
        WHERE id = ?
        RETURNING id, name, duration_minutes, is_archived
        "#,
    )
    .bind(archived)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(service)
}

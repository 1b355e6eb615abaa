use appointly_core::models::appointment::{AppointmentStatus, NewAppointment};
use appointly_core::models::time_slot::format_hhmm;
use chrono::{NaiveDate, Utc};
use eyre::Result;
use uuid::Uuid;

use crate::DbPool;
use crate::models::DbAppointment;
use crate::schema::OVERLAP_GUARD;

const APPOINTMENT_COLUMNS: &str =
    "id, specialist_id, service_id, client_id, date, start_time, end_time, status, created_at, updated_at";

/// Inserts an appointment. The overlap triggers run inside the same statement, so a
/// conflicting active appointment aborts the insert; see [`is_overlap_violation`].
pub async fn insert_appointment(
    pool: &DbPool,
    appointment: &NewAppointment,
) -> Result<DbAppointment> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Inserting appointment: id={}, specialist={}, date={}, {}-{}",
        id,
        appointment.specialist_id,
        appointment.date,
        format_hhmm(appointment.start_time),
        format_hhmm(appointment.end_time)
    );

    let row = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        INSERT INTO appointments
            (id, specialist_id, service_id, client_id, date, start_time, end_time, status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {}
        "#,
        APPOINTMENT_COLUMNS
    ))
    .bind(id)
    .bind(appointment.specialist_id)
    .bind(appointment.service_id)
    .bind(appointment.client_id)
    .bind(appointment.date)
    .bind(format_hhmm(appointment.start_time))
    .bind(format_hhmm(appointment.end_time))
    .bind(appointment.status.as_str())
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_appointment(pool: &DbPool, id: Uuid) -> Result<Option<DbAppointment>> {
    let row = sqlx::query_as::<_, DbAppointment>(&format!(
        "SELECT {} FROM appointments WHERE id = ?",
        APPOINTMENT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn list_active_by_date(
    pool: &DbPool,
    specialist_id: i64,
    date: NaiveDate,
) -> Result<Vec<DbAppointment>> {
    list_active_in_range(pool, specialist_id, date, date).await
}

pub async fn list_active_in_range(
    pool: &DbPool,
    specialist_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DbAppointment>> {
    let rows = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {} FROM appointments
        WHERE specialist_id = ?
          AND date BETWEEN ? AND ?
          AND status IN ('pending', 'confirmed')
        ORDER BY date, start_time
        "#,
        APPOINTMENT_COLUMNS
    ))
    .bind(specialist_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn list_confirmed_through(pool: &DbPool, date: NaiveDate) -> Result<Vec<DbAppointment>> {
    let rows = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {} FROM appointments
        WHERE status = 'confirmed' AND date <= ?
        ORDER BY date, end_time
        "#,
        APPOINTMENT_COLUMNS
    ))
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn list_by_client(pool: &DbPool, client_id: i64) -> Result<Vec<DbAppointment>> {
    let rows = sqlx::query_as::<_, DbAppointment>(&format!(
        "SELECT {} FROM appointments WHERE client_id = ? ORDER BY date, start_time",
        APPOINTMENT_COLUMNS
    ))
    .bind(client_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Moves an appointment from `expected` to `next` in one statement.
///
/// Returns `None` when the row is gone or no longer has the expected status.
pub async fn update_appointment_status(
    pool: &DbPool,
    id: Uuid,
    expected: AppointmentStatus,
    next: AppointmentStatus,
) -> Result<Option<DbAppointment>> {
    tracing::debug!("Updating appointment {}: {} -> {}", id, expected, next);

    let row = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET status = ?, updated_at = ?
        WHERE id = ? AND status = ?
        RETURNING {}
        "#,
        APPOINTMENT_COLUMNS
    ))
    .bind(next.as_str())
    .bind(Utc::now())
    .bind(id)
    .bind(expected.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn delete_appointment(pool: &DbPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM appointments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Whether an error came from the overlap triggers.
pub fn is_overlap_violation(error: &eyre::Report) -> bool {
    match error.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_error)) => db_error.message().contains(OVERLAP_GUARD),
        _ => false,
    }
}

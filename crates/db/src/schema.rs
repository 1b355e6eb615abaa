use eyre::Result;
use tracing::info;

use crate::DbPool;

/// Message raised by the overlap triggers. The store matches on it.
pub const OVERLAP_GUARD: &str = "appointment_overlap";

pub async fn initialize_database(pool: &DbPool) -> Result<()> {
    info!("Initializing database schema...");

    // Create specialists table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS specialists (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create schedule_entries table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schedule_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            specialist_id INTEGER NOT NULL REFERENCES specialists(id) ON DELETE CASCADE,
            day_of_week INTEGER NOT NULL CHECK (day_of_week BETWEEN 1 AND 7),
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            CONSTRAINT valid_entry_range CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create schedule_overrides table; a row without times marks a day off
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schedule_overrides (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            specialist_id INTEGER NOT NULL REFERENCES specialists(id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            start_time TEXT NULL,
            end_time TEXT NULL,
            CONSTRAINT valid_override_range CHECK (
                (start_time IS NULL AND end_time IS NULL)
                OR (start_time IS NOT NULL AND end_time IS NOT NULL AND end_time > start_time)
            )
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create services table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS services (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            duration_minutes INTEGER NOT NULL CHECK (duration_minutes > 0),
            is_archived INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointments table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id BLOB PRIMARY KEY,
            specialist_id INTEGER NOT NULL REFERENCES specialists(id),
            service_id INTEGER NOT NULL REFERENCES services(id),
            client_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            status TEXT NOT NULL CHECK (status IN ('pending', 'confirmed', 'completed', 'cancelled')),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            CONSTRAINT valid_appointment_range CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // No two active appointments of one specialist may overlap on a date
    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS appointments_no_overlap_insert
        BEFORE INSERT ON appointments
        WHEN NEW.status IN ('pending', 'confirmed')
        BEGIN
            SELECT RAISE(ABORT, 'appointment_overlap')
            WHERE EXISTS (
                SELECT 1 FROM appointments
                WHERE specialist_id = NEW.specialist_id
                  AND date = NEW.date
                  AND status IN ('pending', 'confirmed')
                  AND start_time < NEW.end_time
                  AND NEW.start_time < end_time
            );
        END;
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS appointments_no_overlap_update
        BEFORE UPDATE OF specialist_id, date, start_time, end_time, status ON appointments
        WHEN NEW.status IN ('pending', 'confirmed')
        BEGIN
            SELECT RAISE(ABORT, 'appointment_overlap')
            WHERE EXISTS (
                SELECT 1 FROM appointments
                WHERE id <> NEW.id
                  AND specialist_id = NEW.specialist_id
                  AND date = NEW.date
                  AND status IN ('pending', 'confirmed')
                  AND start_time < NEW.end_time
                  AND NEW.start_time < end_time
            );
        END;
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_schedule_entries_specialist_id ON schedule_entries(specialist_id);
        CREATE INDEX IF NOT EXISTS idx_schedule_overrides_specialist_date ON schedule_overrides(specialist_id, date);
        CREATE INDEX IF NOT EXISTS idx_appointments_specialist_date ON appointments(specialist_id, date);
        CREATE INDEX IF NOT EXISTS idx_appointments_client_id ON appointments(client_id);
        CREATE INDEX IF NOT EXISTS idx_appointments_status_date ON appointments(status, date);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}

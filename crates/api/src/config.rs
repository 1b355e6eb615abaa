//! # API Configuration Module
//!
//! Loads the server configuration from environment variables, with defaults where
//! appropriate. Invalid values fail startup rather than being silently replaced.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: SQLite connection string (default: "sqlite://appointly.db?mode=rwc")
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `BOOKING_SLOT_STEP_MINUTES`: Distance between offered slot starts (default: 30)
//! - `BOOKING_INITIAL_STATUS`: Status of a new booking, `pending` or `confirmed`
//!   (default: "pending")
//! - `BOOKING_TIMEZONE`: IANA zone that schedules are expressed in (default: "UTC")
//! - `BOOKING_MAX_DATE_RANGE_DAYS`: Longest available-dates query (default: 92)
//! - `AUTO_COMPLETE_INTERVAL_SECONDS`: Period of the auto-complete job (default: 300)

use std::env;
use std::str::FromStr;

use appointly_core::clock::SystemClock;
use appointly_core::config::{BookingConfig, DEFAULT_MAX_DATE_RANGE_DAYS, DEFAULT_SLOT_STEP_MINUTES};
use appointly_core::models::appointment::AppointmentStatus;
use chrono_tz::Tz;
use eyre::{Result, WrapErr, eyre};
use tracing::Level;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://appointly.db?mode=rwc";

/// Configuration for the appointment API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use appointly_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}", config.server_addr());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// SQLite database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Slot step, initial status and range limit for bookings
    pub booking: BookingConfig,

    /// Timezone schedules and appointments are expressed in
    pub timezone: Tz,

    /// Seconds between auto-complete runs
    pub auto_complete_interval: u64,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        // Network settings
        let host = var("API_HOST", "0.0.0.0");
        let port = var("API_PORT", "3000")
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = var("DATABASE_URL", DEFAULT_DATABASE_URL);

        // Logging settings
        let log_level =
            Level::from_str(&var("LOG_LEVEL", "info")).wrap_err("Invalid LOG_LEVEL value")?;

        // CORS settings
        let cors_origins = lookup("API_CORS_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        // Performance settings
        let request_timeout = var("API_REQUEST_TIMEOUT_SECONDS", "30")
            .parse()
            .wrap_err("Invalid API_REQUEST_TIMEOUT_SECONDS value")?;

        // Booking settings
        let slot_step_minutes =
            var("BOOKING_SLOT_STEP_MINUTES", &DEFAULT_SLOT_STEP_MINUTES.to_string())
                .parse()
            .wrap_err("Invalid BOOKING_SLOT_STEP_MINUTES value")?;
        let initial_status = AppointmentStatus::from_str(&var("BOOKING_INITIAL_STATUS", "pending"))
            .wrap_err("Invalid BOOKING_INITIAL_STATUS value")?;
        let max_date_range_days =
            var("BOOKING_MAX_DATE_RANGE_DAYS", &DEFAULT_MAX_DATE_RANGE_DAYS.to_string())
                .parse()
            .wrap_err("Invalid BOOKING_MAX_DATE_RANGE_DAYS value")?;
        let booking = BookingConfig::new(slot_step_minutes, initial_status, max_date_range_days)
            .wrap_err("Invalid booking configuration")?;

        let raw_timezone = var("BOOKING_TIMEZONE", "UTC");
        let timezone = raw_timezone
            .parse::<Tz>()
            .map_err(|e| eyre!("Invalid BOOKING_TIMEZONE '{}': {}", raw_timezone, e))?;

        let auto_complete_interval: u64 = var("AUTO_COMPLETE_INTERVAL_SECONDS", "300")
            .parse()
            .wrap_err("Invalid AUTO_COMPLETE_INTERVAL_SECONDS value")?;
        if auto_complete_interval == 0 {
            return Err(eyre!("AUTO_COMPLETE_INTERVAL_SECONDS must be greater than zero"));
        }

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            booking,
            timezone,
            auto_complete_interval,
        })
    }

    /// Returns the server address as a string (e.g., "127.0.0.1:8080")
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Wall clock in the configured business timezone
    pub fn clock(&self) -> SystemClock {
        SystemClock::new(self.timezone)
    }
}

//! # Availability Handlers
//!
//! Read-only queries over a specialist's free time. Dates arrive as `YYYY-MM-DD`
//! query strings and are validated here so a malformed date gets the same JSON
//! error shape as every other validation failure.

use std::sync::Arc;

use appointly_core::lifecycle::parse_date;
use appointly_core::models::appointment::{AvailableDatesResponse, AvailableSlotsResponse};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Deserialize)]
pub struct AvailableDatesQuery {
    pub service_id: i64,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Deserialize)]
pub struct AvailableSlotsQuery {
    pub service_id: i64,
    pub date: String,
}

/// Dates in an inclusive range with at least one free slot for the service
///
/// ```text
/// GET /api/specialists/:id/available-dates?service_id=2&from=2026-10-19&to=2026-10-31
/// ```
#[axum::debug_handler]
pub async fn available_dates(
    State(state): State<Arc<ApiState>>,
    Path(specialist_id): Path<i64>,
    Query(query): Query<AvailableDatesQuery>,
) -> Result<Json<AvailableDatesResponse>, AppError> {
    let from = parse_date(&query.from)?;
    let to = parse_date(&query.to)?;

    let dates = state
        .availability
        .available_dates(specialist_id, query.service_id, from, to)
        .await?;

    Ok(Json(AvailableDatesResponse {
        specialist_id,
        service_id: query.service_id,
        dates: dates.into_iter().collect(),
    }))
}

/// Free slots on one date, ordered by start time
#[axum::debug_handler]
pub async fn available_slots(
    State(state): State<Arc<ApiState>>,
    Path(specialist_id): Path<i64>,
    Query(query): Query<AvailableSlotsQuery>,
) -> Result<Json<AvailableSlotsResponse>, AppError> {
    let date = parse_date(&query.date)?;

    let slots = state
        .availability
        .available_slots(specialist_id, query.service_id, date)
        .await?;

    Ok(Json(AvailableSlotsResponse {
        specialist_id,
        service_id: query.service_id,
        date,
        slots,
    }))
}

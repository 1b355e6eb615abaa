use std::sync::Arc;

use appointly_core::models::appointment::{
    Appointment, BookAppointmentRequest, CancelAppointmentRequest,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let appointment = state.lifecycle.book(payload).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = state.lifecycle.get(id).await?;
    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelAppointmentRequest>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = state.lifecycle.cancel(id, payload.acting_user_id).await?;
    Ok(Json(appointment))
}

/// A client's bookings in date order, every status included
#[axum::debug_handler]
pub async fn list_client_appointments(
    State(state): State<Arc<ApiState>>,
    Path(client_id): Path<i64>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = state.lifecycle.list_for_client(client_id).await?;
    Ok(Json(appointments))
}

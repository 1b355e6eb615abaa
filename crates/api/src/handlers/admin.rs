//! # Administrative Handlers
//!
//! Status overrides, hard deletes and a manual trigger for the auto-complete job.
//! Status overrides skip the ownership check that client cancellation has, but are
//! still bound by the transition table.

use std::sync::Arc;

use appointly_core::errors::BookingError;
use appointly_core::models::appointment::{
    Appointment, AutoCompleteReport, DeleteAppointmentResponse, UpdateStatusRequest,
};
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn update_status(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = state.lifecycle.set_status(id, payload.status).await?;
    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteAppointmentResponse>, AppError> {
    if !state.lifecycle.delete(id).await? {
        return Err(BookingError::NotFound(format!("Appointment with ID {} not found", id)).into());
    }
    Ok(Json(DeleteAppointmentResponse { id, deleted: true }))
}

#[axum::debug_handler]
pub async fn run_auto_complete(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<AutoCompleteReport>, AppError> {
    let report = state.lifecycle.auto_complete_past().await?;
    Ok(Json(report))
}

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/specialists/:id/available-dates",
            get(handlers::availability::available_dates),
        )
        .route(
            "/api/specialists/:id/available-slots",
            get(handlers::availability::available_slots),
        )
}

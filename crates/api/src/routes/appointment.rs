use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/appointments", post(handlers::appointment::book_appointment))
        .route("/api/appointments/:id", get(handlers::appointment::get_appointment))
        .route(
            "/api/appointments/:id/cancel",
            post(handlers::appointment::cancel_appointment),
        )
        .route(
            "/api/clients/:id/appointments",
            get(handlers::appointment::list_client_appointments),
        )
}

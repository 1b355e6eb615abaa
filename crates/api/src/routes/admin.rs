use axum::{
    Router,
    routing::{delete, patch, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/admin/appointments/auto-complete",
            post(handlers::admin::run_auto_complete),
        )
        .route(
            "/api/admin/appointments/:id/status",
            patch(handlers::admin::update_status),
        )
        .route("/api/admin/appointments/:id", delete(handlers::admin::delete_appointment))
}

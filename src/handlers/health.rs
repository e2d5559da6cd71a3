use actix_web::{web, HttpResponse};

use crate::state::AppState;

/// GET /health - liveness check; no identity required.
pub async fn check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "committees": state.directory.committees().len(),
        "meetings": state.directory.meetings().len(),
    }))
}

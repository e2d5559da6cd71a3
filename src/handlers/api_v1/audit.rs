use actix_web::{web, HttpResponse};
use std::collections::HashMap;

use crate::auth::identity::Caller;
use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/v1/audit - most recent entries first.
/// Query params: limit (default 50, max 500).
pub async fn list(
    state: web::Data<AppState>,
    caller: Caller,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    caller.require_admin("Reading the audit log")?;

    let limit = query
        .get("limit")
        .and_then(|l| l.parse::<usize>().ok())
        .unwrap_or(50)
        .clamp(1, 500);

    Ok(HttpResponse::Ok().json(state.audit.recent(limit)))
}

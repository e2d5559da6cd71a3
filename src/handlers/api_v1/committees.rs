use actix_web::{web, HttpResponse};

use crate::auth::identity::Caller;
use crate::errors::AppError;
use crate::models::meeting::NewCommittee;
use crate::state::AppState;

/// GET /api/v1/committees
pub async fn list(state: web::Data<AppState>, _caller: Caller) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.directory.committees()))
}

/// POST /api/v1/committees
pub async fn create(
    state: web::Data<AppState>,
    caller: Caller,
    body: web::Json<NewCommittee>,
) -> Result<HttpResponse, AppError> {
    caller.require_manager("Creating committees")?;

    let committee = state.directory.create_committee(body.into_inner())?;

    let details = serde_json::json!({ "name": committee.name });
    state.audit.log(caller.user_id, "committee.created", "committee", committee.id, details);

    Ok(HttpResponse::Created().json(committee))
}

/// GET /api/v1/committees/{id}
pub async fn read(
    state: web::Data<AppState>,
    _caller: Caller,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let committee = state.directory.committee(path.into_inner()).ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(committee))
}

/// GET /api/v1/committees/{id}/meetings
pub async fn meetings(
    state: web::Data<AppState>,
    _caller: Caller,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let committee_id = path.into_inner();
    state.directory.committee(committee_id).ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(state.directory.meetings_for_committee(committee_id)))
}

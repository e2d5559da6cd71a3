use actix_web::{web, HttpResponse};

use crate::auth::identity::Caller;
use crate::errors::AppError;
use crate::models::meeting::{MeetingStatus, NewMeeting};
use crate::state::AppState;

use super::StatusForm;

/// GET /api/v1/meetings - newest scheduled first.
pub async fn list(state: web::Data<AppState>, _caller: Caller) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.directory.meetings()))
}

/// POST /api/v1/meetings
pub async fn create(
    state: web::Data<AppState>,
    caller: Caller,
    body: web::Json<NewMeeting>,
) -> Result<HttpResponse, AppError> {
    caller.require_manager("Scheduling meetings")?;

    let meeting = state.directory.create_meeting(body.into_inner(), caller.user_id)?;

    let details = serde_json::json!({
        "committee_id": meeting.committee_id,
        "title": meeting.title,
        "scheduled_at": meeting.scheduled_at,
    });
    state.audit.log(caller.user_id, "meeting.created", "meeting", meeting.id, details);

    Ok(HttpResponse::Created().json(meeting))
}

/// GET /api/v1/meetings/{id}
pub async fn read(
    state: web::Data<AppState>,
    _caller: Caller,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let meeting = state
        .directory
        .meeting(path.into_inner())
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(meeting))
}

/// POST /api/v1/meetings/{id}/status - advance the meeting lifecycle.
pub async fn update_status(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<i64>,
    body: web::Json<StatusForm<MeetingStatus>>,
) -> Result<HttpResponse, AppError> {
    caller.require_manager("Changing meeting status")?;

    let meeting_id = path.into_inner();
    let meeting = state.directory.update_meeting_status(meeting_id, body.status)?;

    let details = serde_json::json!({ "status": meeting.status });
    state.audit.log(caller.user_id, "meeting.status_changed", "meeting", meeting_id, details);

    Ok(HttpResponse::Ok().json(meeting))
}

/// GET /api/v1/meetings/{id}/approval-rate
///
/// `rate` is `null` when nothing has been voted on yet.
pub async fn approval_rate(
    state: web::Data<AppState>,
    _caller: Caller,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let meeting_id = path.into_inner();
    state.directory.meeting(meeting_id).ok_or(AppError::NotFound)?;

    let body = match state.tracker.meeting_approval_rate(meeting_id) {
        Some(rate) => serde_json::json!({
            "approved": rate.approved,
            "voted": rate.voted,
            "rate": rate.value(),
        }),
        None => serde_json::json!({ "rate": null }),
    };
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/v1/meetings/{id}/summary - dashboard statistics.
pub async fn summary(
    state: web::Data<AppState>,
    _caller: Caller,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let meeting_id = path.into_inner();
    state.directory.meeting(meeting_id).ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(state.tracker.meeting_summary(meeting_id)))
}

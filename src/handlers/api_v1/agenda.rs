use actix_web::{web, HttpResponse};

use crate::auth::identity::Caller;
use crate::errors::AppError;
use crate::models::agenda_item::{AgendaItemStatus, NewAgendaItem};
use crate::state::AppState;

use super::StatusForm;

/// GET /api/v1/meetings/{id}/agenda-items - ordered agenda with votes and comments.
pub async fn list_for_meeting(
    state: web::Data<AppState>,
    _caller: Caller,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let meeting_id = path.into_inner();
    state.directory.meeting(meeting_id).ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(state.tracker.agenda_items_for_meeting(meeting_id)))
}

/// POST /api/v1/meetings/{id}/agenda-items
pub async fn create(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<i64>,
    body: web::Json<NewAgendaItem>,
) -> Result<HttpResponse, AppError> {
    caller.require_manager("Adding agenda items")?;

    let meeting_id = path.into_inner();
    state.directory.meeting(meeting_id).ok_or(AppError::NotFound)?;

    let item = state.tracker.add_agenda_item(meeting_id, body.into_inner())?;

    let details = serde_json::json!({
        "meeting_id": meeting_id,
        "order_index": item.order_index,
        "title": item.title,
    });
    state.audit.log(caller.user_id, "agenda_item.created", "agenda_item", item.id, details);

    Ok(HttpResponse::Created().json(item))
}

/// GET /api/v1/agenda-items/{id}
pub async fn read(
    state: web::Data<AppState>,
    _caller: Caller,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let view = state.tracker.agenda_item(path.into_inner())?;
    Ok(HttpResponse::Ok().json(view))
}

/// POST /api/v1/agenda-items/{id}/status
pub async fn update_status(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<i64>,
    body: web::Json<StatusForm<AgendaItemStatus>>,
) -> Result<HttpResponse, AppError> {
    caller.require_manager("Changing agenda item status")?;

    let item_id = path.into_inner();
    let item = state.tracker.update_agenda_item_status(item_id, body.status)?;

    let details = serde_json::json!({ "status": item.status });
    state.audit.log(caller.user_id, "agenda_item.status_changed", "agenda_item", item_id, details);

    Ok(HttpResponse::Ok().json(item))
}

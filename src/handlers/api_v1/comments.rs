use actix_web::{web, HttpResponse};

use crate::auth::identity::Caller;
use crate::errors::AppError;
use crate::models::comment::CommentForm;
use crate::state::AppState;

/// GET /api/v1/agenda-items/{id}/comments - in the order they were posted.
pub async fn list(
    state: web::Data<AppState>,
    _caller: Caller,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let comments = state.tracker.comments_for_item(path.into_inner())?;
    Ok(HttpResponse::Ok().json(comments))
}

/// POST /api/v1/agenda-items/{id}/comments - any identified caller may comment.
pub async fn create(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<i64>,
    body: web::Json<CommentForm>,
) -> Result<HttpResponse, AppError> {
    let item_id = path.into_inner();
    let comment = state.tracker.add_comment(
        item_id,
        caller.user_id,
        &caller.display_name,
        &body.text,
    )?;

    let details = serde_json::json!({ "comment_id": comment.id });
    state.audit.log(caller.user_id, "agenda_comment.created", "agenda_item", item_id, details);

    Ok(HttpResponse::Created().json(comment))
}

use actix_web::{web, HttpResponse};

use crate::auth::identity::Caller;
use crate::errors::AppError;
use crate::models::vote_result::VoteTally;
use crate::state::AppState;

/// GET /api/v1/agenda-items/{id}/vote-result - `null` until a vote is recorded.
pub async fn read(
    state: web::Data<AppState>,
    _caller: Caller,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let vote = state.tracker.vote_summary(path.into_inner())?;
    Ok(HttpResponse::Ok().json(vote))
}

/// POST /api/v1/agenda-items/{id}/vote-result
///
/// The outcome is derived from the counts; a second submission for the same
/// item is rejected, as is any vote on an item of a cancelled meeting.
pub async fn record(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<i64>,
    body: web::Json<VoteTally>,
) -> Result<HttpResponse, AppError> {
    caller.require_manager("Recording votes")?;

    let item_id = path.into_inner();
    let meeting_id = state.tracker.agenda_item(item_id)?.item.meeting_id;
    let tally = body.into_inner();
    let result = state.directory.unless_cancelled(meeting_id, || {
        state.tracker.record_vote_result(
            item_id,
            tally.votes_for,
            tally.votes_against,
            tally.votes_abstain,
        )
    })?;

    let details = serde_json::json!({
        "votes_for": result.votes_for,
        "votes_against": result.votes_against,
        "votes_abstain": result.votes_abstain,
        "outcome": result.outcome,
    });
    state.audit.log(caller.user_id, "vote_result.recorded", "agenda_item", item_id, details);

    Ok(HttpResponse::Created().json(result))
}

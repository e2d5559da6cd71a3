use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use std::fmt;

/// Business-rule and input failures raised by the agenda tracker and the
/// meeting directory. None of these are transient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// Malformed or missing required field.
    Validation(String),
    /// Order index already used by another item of the same meeting.
    DuplicateOrder { meeting_id: i64, order_index: i64 },
    /// The agenda item already has a recorded vote result.
    DuplicateVote { agenda_item_id: i64 },
    /// Illegal status transition or operation for the current status.
    InvalidState(String),
    NotFound(String),
}

impl TrackerError {
    /// Stable identifier for the error kind, used in API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            TrackerError::Validation(_) => "validation_error",
            TrackerError::DuplicateOrder { .. } => "duplicate_order",
            TrackerError::DuplicateVote { .. } => "duplicate_vote",
            TrackerError::InvalidState(_) => "invalid_state",
            TrackerError::NotFound(_) => "not_found",
        }
    }
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerError::Validation(msg) => write!(f, "Validation error: {msg}"),
            TrackerError::DuplicateOrder { meeting_id, order_index } => write!(
                f,
                "Order index {order_index} is already used in meeting {meeting_id}"
            ),
            TrackerError::DuplicateVote { agenda_item_id } => write!(
                f,
                "Agenda item {agenda_item_id} already has a recorded vote result"
            ),
            TrackerError::InvalidState(msg) => write!(f, "Invalid state: {msg}"),
            TrackerError::NotFound(what) => write!(f, "Not found: {what}"),
        }
    }
}

impl std::error::Error for TrackerError {}

/// JSON error body returned by the API.
#[derive(Serialize, Debug, Clone)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug)]
pub enum AppError {
    Tracker(TrackerError),
    Unauthenticated(String),
    PermissionDenied(String),
    NotFound,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Tracker(e) => write!(f, "{e}"),
            AppError::Unauthenticated(e) => write!(f, "Not authenticated: {e}"),
            AppError::PermissionDenied(e) => write!(f, "Permission denied: {e}"),
            AppError::NotFound => write!(f, "Not found"),
        }
    }
}

impl AppError {
    fn kind(&self) -> &'static str {
        match self {
            AppError::Tracker(e) => e.kind(),
            AppError::Unauthenticated(_) => "unauthenticated",
            AppError::PermissionDenied(_) => "permission_denied",
            AppError::NotFound => "not_found",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Tracker(TrackerError::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::Tracker(TrackerError::DuplicateOrder { .. })
            | AppError::Tracker(TrackerError::DuplicateVote { .. })
            | AppError::Tracker(TrackerError::InvalidState(_)) => StatusCode::CONFLICT,
            AppError::Tracker(TrackerError::NotFound(_)) | AppError::NotFound => {
                StatusCode::NOT_FOUND
            }
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{self}");
        } else {
            log::debug!("Request rejected: {self}");
        }
        HttpResponse::build(status).json(ApiErrorResponse {
            error: self.kind().to_string(),
            details: Some(self.to_string()),
        })
    }
}

impl From<TrackerError> for AppError {
    fn from(e: TrackerError) -> Self {
        AppError::Tracker(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_distinct() {
        let errors = [
            TrackerError::Validation("x".into()),
            TrackerError::DuplicateOrder { meeting_id: 1, order_index: 2 },
            TrackerError::DuplicateVote { agenda_item_id: 3 },
            TrackerError::InvalidState("y".into()),
            TrackerError::NotFound("z".into()),
        ];
        let mut kinds: Vec<_> = errors.iter().map(|e| e.kind()).collect();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), errors.len());
    }

    #[test]
    fn status_codes_follow_error_kind() {
        let dup = AppError::from(TrackerError::DuplicateVote { agenda_item_id: 1 });
        assert_eq!(dup.status_code(), StatusCode::CONFLICT);
        let bad = AppError::from(TrackerError::Validation("title".into()));
        assert_eq!(bad.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::PermissionDenied("agenda".into()).status_code(), StatusCode::FORBIDDEN);
    }
}

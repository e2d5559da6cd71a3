use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A free-text remark attached to an agenda item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaComment {
    pub id: i64,
    pub agenda_item_id: i64,
    pub author_user_id: i64,
    pub author_display_name: String, // denormalized for display
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for posting a comment. The author comes from the caller's
/// identity, not from the body.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentForm {
    pub text: String,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::auth::validate;
use crate::errors::TrackerError;
use crate::models::comment::AgendaComment;
use crate::models::vote_result::VoteResult;

pub const TITLE_MAX_LEN: usize = 500;
pub const CATEGORY_MAX_LEN: usize = 100;
pub const PRESENTER_MAX_LEN: usize = 200;
pub const FILE_REF_MAX_LEN: usize = 500;
pub const ESTIMATED_DURATION_MAX: i64 = i32::MAX as i64; // minutes

/// Lifecycle of an agenda item:
/// `pending -> in_progress -> completed`, and `pending | in_progress -> deferred`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgendaItemStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Deferred,
}

impl AgendaItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgendaItemStatus::Pending => "pending",
            AgendaItemStatus::InProgress => "in_progress",
            AgendaItemStatus::Completed => "completed",
            AgendaItemStatus::Deferred => "deferred",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AgendaItemStatus::Completed | AgendaItemStatus::Deferred)
    }

    pub fn can_transition_to(&self, next: AgendaItemStatus) -> bool {
        use AgendaItemStatus::*;
        matches!(
            (self, next),
            (Pending, InProgress)
                | (InProgress, Completed)
                | (Pending, Deferred)
                | (InProgress, Deferred)
        )
    }
}

impl fmt::Display for AgendaItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One discussion point within a meeting's agenda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaItem {
    pub id: i64,
    pub meeting_id: i64,
    pub order_index: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub presenter: Option<String>,
    pub estimated_duration: Option<i64>, // minutes
    pub status: AgendaItemStatus,
    pub introduction_file: Option<String>,
    pub decision_file: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for adding an agenda item. Document references are opaque strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAgendaItem {
    pub order_index: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub presenter: Option<String>,
    #[serde(default)]
    pub estimated_duration: Option<i64>,
    #[serde(default)]
    pub introduction_file: Option<String>,
    #[serde(default)]
    pub decision_file: Option<String>,
}

impl NewAgendaItem {
    pub fn new(order_index: i64, title: impl Into<String>) -> Self {
        Self {
            order_index,
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn presenter(mut self, presenter: impl Into<String>) -> Self {
        self.presenter = Some(presenter.into());
        self
    }

    pub fn estimated_duration(mut self, minutes: i64) -> Self {
        self.estimated_duration = Some(minutes);
        self
    }

    pub fn introduction_file(mut self, reference: impl Into<String>) -> Self {
        self.introduction_file = Some(reference.into());
        self
    }

    pub fn decision_file(mut self, reference: impl Into<String>) -> Self {
        self.decision_file = Some(reference.into());
        self
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        let mut errors = Vec::new();
        errors.extend(validate::validate_non_negative(self.order_index, "Order index"));
        errors.extend(validate::validate_required(&self.title, "Title", TITLE_MAX_LEN));
        errors.extend(validate::validate_optional(self.category.as_deref(), "Category", CATEGORY_MAX_LEN));
        errors.extend(validate::validate_optional(self.presenter.as_deref(), "Presenter", PRESENTER_MAX_LEN));
        errors.extend(validate::validate_optional(
            self.introduction_file.as_deref(),
            "Introduction file",
            FILE_REF_MAX_LEN,
        ));
        errors.extend(validate::validate_optional(
            self.decision_file.as_deref(),
            "Decision file",
            FILE_REF_MAX_LEN,
        ));
        if let Some(minutes) = self.estimated_duration {
            errors.extend(validate::validate_non_negative(minutes, "Estimated duration"));
            if minutes > ESTIMATED_DURATION_MAX {
                errors.push(format!("Estimated duration must be at most {ESTIMATED_DURATION_MAX} minutes"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(TrackerError::Validation(errors.join("; ")))
        }
    }

    /// Build the stored item. Blank optional fields are stored as absent.
    pub(crate) fn into_item(self, id: i64, meeting_id: i64, now: DateTime<Utc>) -> AgendaItem {
        AgendaItem {
            id,
            meeting_id,
            order_index: self.order_index,
            title: self.title.trim().to_string(),
            description: non_blank(self.description),
            category: non_blank(self.category),
            presenter: non_blank(self.presenter),
            estimated_duration: self.estimated_duration,
            status: AgendaItemStatus::Pending,
            introduction_file: non_blank(self.introduction_file),
            decision_file: non_blank(self.decision_file),
            created_at: now,
            updated_at: now,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// An agenda item together with its vote result and comments, as returned
/// to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgendaItemView {
    #[serde(flatten)]
    pub item: AgendaItem,
    pub vote_result: Option<VoteResult>,
    pub comments: Vec<AgendaComment>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::auth::validate;
use crate::errors::TrackerError;

pub const NAME_MAX_LEN: usize = 255;
pub const LOCATION_MAX_LEN: usize = 255;

/// An organizational body that owns meetings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Committee {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCommittee {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewCommittee {
    pub fn validate(&self) -> Result<(), TrackerError> {
        match validate::validate_required(&self.name, "Name", NAME_MAX_LEN) {
            Some(msg) => Err(TrackerError::Validation(msg)),
            None => Ok(()),
        }
    }
}

/// Meeting lifecycle:
/// `scheduled -> in_progress -> completed`, and `scheduled | in_progress -> cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl MeetingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingStatus::Scheduled => "scheduled",
            MeetingStatus::InProgress => "in_progress",
            MeetingStatus::Completed => "completed",
            MeetingStatus::Cancelled => "cancelled",
        }
    }

    pub fn can_transition_to(&self, next: MeetingStatus) -> bool {
        use MeetingStatus::*;
        matches!(
            (self, next),
            (Scheduled, InProgress)
                | (InProgress, Completed)
                | (Scheduled, Cancelled)
                | (InProgress, Cancelled)
        )
    }
}

impl fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: i64,
    pub committee_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub status: MeetingStatus,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

/// Input for scheduling a meeting. `created_by` comes from the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMeeting {
    pub committee_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
}

impl NewMeeting {
    pub fn new(committee_id: i64, title: impl Into<String>) -> Self {
        Self {
            committee_id,
            title: title.into(),
            description: None,
            scheduled_at: None,
            location: None,
        }
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        let mut errors = Vec::new();
        errors.extend(validate::validate_required(&self.title, "Title", NAME_MAX_LEN));
        errors.extend(validate::validate_optional(self.location.as_deref(), "Location", LOCATION_MAX_LEN));
        if errors.is_empty() {
            Ok(())
        } else {
            Err(TrackerError::Validation(errors.join("; ")))
        }
    }
}

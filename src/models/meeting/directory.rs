//! In-memory committee and meeting directory.
//!
//! The agenda tracker treats meeting ids as opaque; this directory is where
//! the API layer resolves them to committees, locations and lifecycle status.

use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::errors::TrackerError;
use super::types::*;

#[derive(Debug, Default)]
struct DirectoryState {
    committees: BTreeMap<i64, Committee>,
    meetings: BTreeMap<i64, Meeting>,
    next_committee_id: i64,
    next_meeting_id: i64,
}

#[derive(Debug)]
pub struct MeetingDirectory {
    default_location: String,
    state: RwLock<DirectoryState>,
}

impl MeetingDirectory {
    pub fn new(default_location: impl Into<String>) -> Self {
        Self {
            default_location: default_location.into(),
            state: RwLock::new(DirectoryState::default()),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, DirectoryState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, DirectoryState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn create_committee(&self, input: NewCommittee) -> Result<Committee, TrackerError> {
        input.validate()?;
        let mut state = self.write();
        state.next_committee_id += 1;
        let committee = Committee {
            id: state.next_committee_id,
            name: input.name.trim().to_string(),
            description: input
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        };
        state.committees.insert(committee.id, committee.clone());
        log::info!("Committee {} created: {}", committee.id, committee.name);
        Ok(committee)
    }

    pub fn committee(&self, id: i64) -> Option<Committee> {
        self.read().committees.get(&id).cloned()
    }

    pub fn committees(&self) -> Vec<Committee> {
        self.read().committees.values().cloned().collect()
    }

    /// Schedule a meeting for an existing committee. A missing location
    /// falls back to the directory's default location.
    pub fn create_meeting(&self, input: NewMeeting, created_by: i64) -> Result<Meeting, TrackerError> {
        input.validate()?;
        let mut state = self.write();
        if !state.committees.contains_key(&input.committee_id) {
            return Err(TrackerError::NotFound(format!("committee {}", input.committee_id)));
        }
        state.next_meeting_id += 1;
        let location = input
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| self.default_location.clone());
        let meeting = Meeting {
            id: state.next_meeting_id,
            committee_id: input.committee_id,
            title: input.title.trim().to_string(),
            description: input
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            scheduled_at: input.scheduled_at,
            location: Some(location),
            status: MeetingStatus::Scheduled,
            created_by,
            created_at: Utc::now(),
        };
        state.meetings.insert(meeting.id, meeting.clone());
        log::info!(
            "Meeting {} scheduled for committee {}",
            meeting.id,
            meeting.committee_id
        );
        Ok(meeting)
    }

    pub fn meeting(&self, id: i64) -> Option<Meeting> {
        self.read().meetings.get(&id).cloned()
    }

    /// All meetings, most recently scheduled first; unscheduled meetings last.
    pub fn meetings(&self) -> Vec<Meeting> {
        let mut meetings: Vec<Meeting> = self.read().meetings.values().cloned().collect();
        sort_newest_first(&mut meetings);
        meetings
    }

    pub fn meetings_for_committee(&self, committee_id: i64) -> Vec<Meeting> {
        let mut meetings: Vec<Meeting> = self
            .read()
            .meetings
            .values()
            .filter(|m| m.committee_id == committee_id)
            .cloned()
            .collect();
        sort_newest_first(&mut meetings);
        meetings
    }

    /// Run `f` unless the meeting is cancelled. The directory stays
    /// read-locked while `f` runs, so the meeting cannot be cancelled in
    /// between. Meetings unknown to the directory are not checked.
    pub fn unless_cancelled<R, F>(&self, meeting_id: i64, f: F) -> Result<R, TrackerError>
    where
        F: FnOnce() -> Result<R, TrackerError>,
    {
        let state = self.read();
        let cancelled = state
            .meetings
            .get(&meeting_id)
            .is_some_and(|m| m.status == MeetingStatus::Cancelled);
        if cancelled {
            return Err(TrackerError::InvalidState(format!("meeting {meeting_id} is cancelled")));
        }
        f()
    }

    pub fn update_meeting_status(&self, id: i64, next: MeetingStatus) -> Result<Meeting, TrackerError> {
        let mut state = self.write();
        let meeting = state
            .meetings
            .get_mut(&id)
            .ok_or_else(|| TrackerError::NotFound(format!("meeting {id}")))?;
        if !meeting.status.can_transition_to(next) {
            return Err(TrackerError::InvalidState(format!(
                "meeting {id} cannot move from {} to {next}",
                meeting.status
            )));
        }
        log::info!("Meeting {id}: {} -> {next}", meeting.status);
        meeting.status = next;
        Ok(meeting.clone())
    }
}

fn sort_newest_first(meetings: &mut [Meeting]) {
    // None sorts before Some, so reversing the key puts unscheduled last.
    meetings.sort_by(|a, b| b.scheduled_at.cmp(&a.scheduled_at).then(a.id.cmp(&b.id)));
}

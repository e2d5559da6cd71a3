//! Shared test infrastructure.
//!
//! - `tracker()` / `tracker_with()` - an empty agenda tracker
//! - `add_item()` - add an agenda item with a generated title
//! - `test_state()` - application state with one committee and one meeting

#![allow(dead_code)]

use council::config::AppConfig;
use council::models::agenda_item::{AgendaItem, NewAgendaItem};
use council::models::meeting::{NewCommittee, NewMeeting};
use council::models::vote_result::VotePolicy;
use council::state::AppState;
use council::tracker::AgendaOutcomeTracker;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const MEETING_ID: i64 = 1;
pub const ADMIN_ID: &str = "1";
pub const SECRETARY_ID: &str = "2";
pub const MEMBER_ID: &str = "3";

// ============================================================================
// TRACKER SETUP
// ============================================================================

pub fn tracker() -> AgendaOutcomeTracker {
    AgendaOutcomeTracker::new(VotePolicy::default())
}

pub fn tracker_with(policy: VotePolicy) -> AgendaOutcomeTracker {
    AgendaOutcomeTracker::new(policy)
}

pub fn add_item(tracker: &AgendaOutcomeTracker, meeting_id: i64, order_index: i64) -> AgendaItem {
    tracker
        .add_agenda_item(meeting_id, NewAgendaItem::new(order_index, format!("Item {order_index}")))
        .expect("Failed to add agenda item")
}

// ============================================================================
// APP STATE SETUP
// ============================================================================

/// Returns the state plus the ids of the seeded committee and meeting.
pub fn test_state(config: &AppConfig) -> (AppState, i64, i64) {
    let state = AppState::new(config);
    let committee = state
        .directory
        .create_committee(NewCommittee {
            name: "Municipal Council".to_string(),
            description: None,
        })
        .expect("Failed to create committee");
    let meeting = state
        .directory
        .create_meeting(NewMeeting::new(committee.id, "Regular session"), 1)
        .expect("Failed to create meeting");
    (state, committee.id, meeting.id)
}

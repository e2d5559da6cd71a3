//! Agenda outcome tracking across meetings.
//!
//! Each meeting's agenda sits behind its own reader-writer lock. Mutations of
//! one meeting are serialized, so the order-index uniqueness check and the
//! single-vote check happen atomically with their writes, while different
//! meetings never contend. Reads clone a snapshot under the read lock.

pub mod agenda;

pub use agenda::{IdSequence, Ids, MeetingAgenda, MeetingSummary};

use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::errors::TrackerError;
use crate::models::agenda_item::{AgendaItem, AgendaItemStatus, AgendaItemView, NewAgendaItem};
use crate::models::comment::AgendaComment;
use crate::models::vote_result::{ApprovalRate, VotePolicy, VoteResult, VoteTally};

type SharedAgenda = Arc<RwLock<MeetingAgenda>>;

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

#[derive(Debug, Default)]
pub struct AgendaOutcomeTracker {
    policy: VotePolicy,
    ids: Ids,
    agendas: RwLock<HashMap<i64, SharedAgenda>>,
    /// agenda item id -> meeting id
    item_meetings: RwLock<HashMap<i64, i64>>,
}

impl AgendaOutcomeTracker {
    pub fn new(policy: VotePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    fn agenda(&self, meeting_id: i64) -> Option<SharedAgenda> {
        read_lock(&self.agendas).get(&meeting_id).cloned()
    }

    fn agenda_or_create(&self, meeting_id: i64) -> SharedAgenda {
        if let Some(agenda) = self.agenda(meeting_id) {
            return agenda;
        }
        write_lock(&self.agendas)
            .entry(meeting_id)
            .or_insert_with(|| Arc::new(RwLock::new(MeetingAgenda::new(meeting_id))))
            .clone()
    }

    fn agenda_for_item(&self, item_id: i64) -> Result<SharedAgenda, TrackerError> {
        let meeting_id = read_lock(&self.item_meetings)
            .get(&item_id)
            .copied()
            .ok_or_else(|| TrackerError::NotFound(format!("agenda item {item_id}")))?;
        self.agenda(meeting_id)
            .ok_or_else(|| TrackerError::NotFound(format!("agenda item {item_id}")))
    }

    /// Add an item to a meeting's agenda. The meeting id is trusted as given;
    /// the first item creates the meeting's agenda.
    pub fn add_agenda_item(&self, meeting_id: i64, input: NewAgendaItem) -> Result<AgendaItem, TrackerError> {
        input.validate()?;
        let agenda = self.agenda_or_create(meeting_id);
        let mut agenda = write_lock(&agenda);
        let item = agenda.add_item(&self.ids, input, Utc::now())?;
        write_lock(&self.item_meetings).insert(item.id, meeting_id);
        log::info!(
            "Agenda item {} added to meeting {meeting_id} at position {}",
            item.id,
            item.order_index
        );
        Ok(item)
    }

    /// Record the concluded vote for an agenda item and derive its outcome.
    pub fn record_vote_result(
        &self,
        item_id: i64,
        votes_for: i64,
        votes_against: i64,
        votes_abstain: i64,
    ) -> Result<VoteResult, TrackerError> {
        let tally = VoteTally::new(votes_for, votes_against, votes_abstain);
        tally.validated_total()?;
        let agenda = self.agenda_for_item(item_id)?;
        let result = write_lock(&agenda).record_vote(&self.ids, &self.policy, item_id, tally, Utc::now())?;
        log::info!(
            "Vote recorded for agenda item {item_id}: {}/{}/{} -> {}",
            result.votes_for,
            result.votes_against,
            result.votes_abstain,
            result.outcome
        );
        Ok(result)
    }

    pub fn add_comment(
        &self,
        item_id: i64,
        author_user_id: i64,
        author_display_name: &str,
        text: &str,
    ) -> Result<AgendaComment, TrackerError> {
        if text.trim().is_empty() {
            return Err(TrackerError::Validation("Comment text is required".to_string()));
        }
        let agenda = self.agenda_for_item(item_id)?;
        let comment = write_lock(&agenda).add_comment(
            &self.ids,
            item_id,
            author_user_id,
            author_display_name,
            text,
            Utc::now(),
        )?;
        log::debug!("Comment {} added to agenda item {item_id}", comment.id);
        Ok(comment)
    }

    pub fn update_agenda_item_status(
        &self,
        item_id: i64,
        status: AgendaItemStatus,
    ) -> Result<AgendaItem, TrackerError> {
        let agenda = self.agenda_for_item(item_id)?;
        let item = write_lock(&agenda).set_status(&self.policy, item_id, status, Utc::now())?;
        log::info!("Agenda item {item_id} is now {}", item.status);
        Ok(item)
    }

    /// Items of a meeting ascending by order index. Empty for a meeting
    /// without items.
    pub fn agenda_items_for_meeting(&self, meeting_id: i64) -> Vec<AgendaItemView> {
        match self.agenda(meeting_id) {
            Some(agenda) => read_lock(&agenda).items(),
            None => Vec::new(),
        }
    }

    pub fn agenda_item(&self, item_id: i64) -> Result<AgendaItemView, TrackerError> {
        let agenda = self.agenda_for_item(item_id)?;
        read_lock(&agenda).item(item_id)
    }

    /// `Ok(None)` when the item exists but has not been voted on.
    pub fn vote_summary(&self, item_id: i64) -> Result<Option<VoteResult>, TrackerError> {
        let agenda = self.agenda_for_item(item_id)?;
        read_lock(&agenda).vote(item_id)
    }

    pub fn comments_for_item(&self, item_id: i64) -> Result<Vec<AgendaComment>, TrackerError> {
        let agenda = self.agenda_for_item(item_id)?;
        read_lock(&agenda).comments(item_id)
    }

    /// `None` when no item of the meeting has a recorded vote.
    pub fn meeting_approval_rate(&self, meeting_id: i64) -> Option<ApprovalRate> {
        let agenda = self.agenda(meeting_id)?;
        read_lock(&agenda).approval_rate()
    }

    pub fn meeting_summary(&self, meeting_id: i64) -> MeetingSummary {
        match self.agenda(meeting_id) {
            Some(agenda) => read_lock(&agenda).summary(),
            None => MeetingAgenda::new(meeting_id).summary(),
        }
    }
}

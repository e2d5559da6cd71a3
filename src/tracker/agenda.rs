//! The agenda of a single meeting: items keyed by order index, each with at
//! most one vote result and an append-only comment list.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};

use crate::errors::TrackerError;
use crate::models::agenda_item::{AgendaItem, AgendaItemStatus, AgendaItemView, NewAgendaItem};
use crate::models::comment::AgendaComment;
use crate::models::vote_result::{ApprovalRate, VoteOutcome, VotePolicy, VoteResult, VoteTally};

/// Monotonic identifier source, starting at 1.
#[derive(Debug, Default)]
pub struct IdSequence(AtomicI64);

impl IdSequence {
    pub fn next(&self) -> i64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Identifier sources shared by every meeting of a tracker, so item, vote
/// and comment ids are unique tracker-wide.
#[derive(Debug, Default)]
pub struct Ids {
    pub items: IdSequence,
    pub votes: IdSequence,
    pub comments: IdSequence,
}

#[derive(Debug, Clone)]
struct AgendaEntry {
    item: AgendaItem,
    vote: Option<VoteResult>,
    comments: Vec<AgendaComment>,
}

impl AgendaEntry {
    fn view(&self) -> AgendaItemView {
        AgendaItemView {
            item: self.item.clone(),
            vote_result: self.vote.clone(),
            comments: self.comments.clone(),
        }
    }
}

/// Dashboard statistics for one meeting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeetingSummary {
    pub meeting_id: i64,
    pub item_count: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub deferred: usize,
    pub voted: usize,
    pub approved: usize,
    pub rejected: usize,
    pub no_quorum: usize,
    pub estimated_minutes: i64,
    pub approval_rate: Option<ApprovalRate>,
}

#[derive(Debug, Clone)]
pub struct MeetingAgenda {
    meeting_id: i64,
    entries: BTreeMap<i64, AgendaEntry>,
    order_by_item: HashMap<i64, i64>,
}

impl MeetingAgenda {
    pub fn new(meeting_id: i64) -> Self {
        Self {
            meeting_id,
            entries: BTreeMap::new(),
            order_by_item: HashMap::new(),
        }
    }

    fn entry(&self, item_id: i64) -> Result<&AgendaEntry, TrackerError> {
        self.order_by_item
            .get(&item_id)
            .and_then(|order| self.entries.get(order))
            .ok_or_else(|| TrackerError::NotFound(format!("agenda item {item_id}")))
    }

    fn entry_mut(&mut self, item_id: i64) -> Result<&mut AgendaEntry, TrackerError> {
        self.order_by_item
            .get(&item_id)
            .and_then(|order| self.entries.get_mut(order))
            .ok_or_else(|| TrackerError::NotFound(format!("agenda item {item_id}")))
    }

    pub fn add_item(
        &mut self,
        ids: &Ids,
        input: NewAgendaItem,
        now: DateTime<Utc>,
    ) -> Result<AgendaItem, TrackerError> {
        input.validate()?;
        if self.entries.contains_key(&input.order_index) {
            return Err(TrackerError::DuplicateOrder {
                meeting_id: self.meeting_id,
                order_index: input.order_index,
            });
        }

        let item = input.into_item(ids.items.next(), self.meeting_id, now);
        self.order_by_item.insert(item.id, item.order_index);
        self.entries.insert(
            item.order_index,
            AgendaEntry {
                item: item.clone(),
                vote: None,
                comments: Vec::new(),
            },
        );
        Ok(item)
    }

    pub fn record_vote(
        &mut self,
        ids: &Ids,
        policy: &VotePolicy,
        item_id: i64,
        tally: VoteTally,
        now: DateTime<Utc>,
    ) -> Result<VoteResult, TrackerError> {
        let total_votes = tally.validated_total()?;
        let entry = self.entry_mut(item_id)?;
        if entry.vote.is_some() {
            return Err(TrackerError::DuplicateVote { agenda_item_id: item_id });
        }
        if entry.item.status.is_terminal() {
            return Err(TrackerError::InvalidState(format!(
                "agenda item {item_id} is {} and can no longer be voted on",
                entry.item.status
            )));
        }

        let result = VoteResult {
            id: ids.votes.next(),
            agenda_item_id: item_id,
            votes_for: tally.votes_for,
            votes_against: tally.votes_against,
            votes_abstain: tally.votes_abstain,
            total_votes,
            outcome: policy.derive_outcome(&tally, total_votes),
            voted_at: now,
        };
        entry.vote = Some(result.clone());
        Ok(result)
    }

    pub fn add_comment(
        &mut self,
        ids: &Ids,
        item_id: i64,
        author_user_id: i64,
        author_display_name: &str,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<AgendaComment, TrackerError> {
        if text.trim().is_empty() {
            return Err(TrackerError::Validation("Comment text is required".to_string()));
        }
        let entry = self.entry_mut(item_id)?;
        let comment = AgendaComment {
            id: ids.comments.next(),
            agenda_item_id: item_id,
            author_user_id,
            author_display_name: author_display_name.to_string(),
            text: text.to_string(),
            created_at: now,
            updated_at: now,
        };
        entry.comments.push(comment.clone());
        Ok(comment)
    }

    /// Move an item through its lifecycle. Completing an item whose category
    /// requires a vote fails until a result is recorded.
    pub fn set_status(
        &mut self,
        policy: &VotePolicy,
        item_id: i64,
        next: AgendaItemStatus,
        now: DateTime<Utc>,
    ) -> Result<AgendaItem, TrackerError> {
        let entry = self.entry_mut(item_id)?;
        let current = entry.item.status;
        if !current.can_transition_to(next) {
            return Err(TrackerError::InvalidState(format!(
                "agenda item {item_id} cannot move from {current} to {next}"
            )));
        }
        if next == AgendaItemStatus::Completed
            && entry.vote.is_none()
            && policy.requires_vote(entry.item.category.as_deref())
        {
            return Err(TrackerError::InvalidState(format!(
                "agenda item {item_id} requires a recorded vote before completion"
            )));
        }

        entry.item.status = next;
        entry.item.updated_at = now;
        Ok(entry.item.clone())
    }

    /// Items ascending by order index, with their votes and comments.
    pub fn items(&self) -> Vec<AgendaItemView> {
        self.entries.values().map(AgendaEntry::view).collect()
    }

    pub fn item(&self, item_id: i64) -> Result<AgendaItemView, TrackerError> {
        self.entry(item_id).map(AgendaEntry::view)
    }

    pub fn vote(&self, item_id: i64) -> Result<Option<VoteResult>, TrackerError> {
        Ok(self.entry(item_id)?.vote.clone())
    }

    pub fn comments(&self, item_id: i64) -> Result<Vec<AgendaComment>, TrackerError> {
        Ok(self.entry(item_id)?.comments.clone())
    }

    pub fn approval_rate(&self) -> Option<ApprovalRate> {
        let (approved, voted) = self
            .entries
            .values()
            .filter_map(|e| e.vote.as_ref())
            .fold((0, 0), |(approved, voted), v| {
                (approved + usize::from(v.outcome == VoteOutcome::Approved), voted + 1)
            });
        ApprovalRate::from_counts(approved, voted)
    }

    pub fn summary(&self) -> MeetingSummary {
        let mut summary = MeetingSummary {
            meeting_id: self.meeting_id,
            item_count: self.entries.len(),
            pending: 0,
            in_progress: 0,
            completed: 0,
            deferred: 0,
            voted: 0,
            approved: 0,
            rejected: 0,
            no_quorum: 0,
            estimated_minutes: 0,
            approval_rate: self.approval_rate(),
        };
        for entry in self.entries.values() {
            match entry.item.status {
                AgendaItemStatus::Pending => summary.pending += 1,
                AgendaItemStatus::InProgress => summary.in_progress += 1,
                AgendaItemStatus::Completed => summary.completed += 1,
                AgendaItemStatus::Deferred => summary.deferred += 1,
            }
            summary.estimated_minutes = summary
                .estimated_minutes
                .saturating_add(entry.item.estimated_duration.unwrap_or(0));
            if let Some(vote) = &entry.vote {
                summary.voted += 1;
                match vote.outcome {
                    VoteOutcome::Approved => summary.approved += 1,
                    VoteOutcome::Rejected => summary.rejected += 1,
                    VoteOutcome::NoQuorum => summary.no_quorum += 1,
                }
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::agenda_item::ESTIMATED_DURATION_MAX;

    fn agenda_with(orders: &[i64]) -> (MeetingAgenda, Ids) {
        let ids = Ids::default();
        let mut agenda = MeetingAgenda::new(1);
        for &order in orders {
            agenda
                .add_item(&ids, NewAgendaItem::new(order, format!("Item {order}")), Utc::now())
                .expect("add item");
        }
        (agenda, ids)
    }

    #[test]
    fn ids_start_at_one() {
        let seq = IdSequence::default();
        assert_eq!(seq.next(), 1);
        assert_eq!(seq.next(), 2);
    }

    #[test]
    fn failed_add_does_not_consume_an_id() {
        let (mut agenda, ids) = agenda_with(&[1]);
        assert!(agenda.add_item(&ids, NewAgendaItem::new(1, "Again"), Utc::now()).is_err());
        assert!(agenda.add_item(&ids, NewAgendaItem::new(2, ""), Utc::now()).is_err());
        let item = agenda.add_item(&ids, NewAgendaItem::new(2, "Next"), Utc::now()).unwrap();
        assert_eq!(item.id, 2);
    }

    #[test]
    fn vote_on_deferred_item_is_refused() {
        let (mut agenda, ids) = agenda_with(&[1]);
        let policy = VotePolicy::default();
        agenda.set_status(&policy, 1, AgendaItemStatus::Deferred, Utc::now()).unwrap();
        let err = agenda
            .record_vote(&ids, &policy, 1, VoteTally::new(3, 1, 0), Utc::now())
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_state");
        assert_eq!(agenda.vote(1), Ok(None));
    }

    #[test]
    fn summary_counts() {
        let (mut agenda, ids) = agenda_with(&[1, 2, 3]);
        let policy = VotePolicy::default();
        agenda.record_vote(&ids, &policy, 1, VoteTally::new(4, 1, 0), Utc::now()).unwrap();
        agenda.record_vote(&ids, &policy, 2, VoteTally::new(0, 0, 0), Utc::now()).unwrap();
        agenda.set_status(&policy, 3, AgendaItemStatus::InProgress, Utc::now()).unwrap();

        let summary = agenda.summary();
        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.pending, 2);
        assert_eq!(summary.in_progress, 1);
        assert_eq!(summary.voted, 2);
        assert_eq!(summary.approved, 1);
        assert_eq!(summary.no_quorum, 1);
        assert_eq!(summary.approval_rate, ApprovalRate::from_counts(1, 2));
    }

    #[test]
    fn summary_estimated_minutes_with_large_durations() {
        let ids = Ids::default();
        let mut agenda = MeetingAgenda::new(1);
        let huge = NewAgendaItem::new(1, "Long").estimated_duration(i64::MAX);
        assert!(agenda.add_item(&ids, huge, Utc::now()).is_err());

        for order in 1..=3 {
            let input = NewAgendaItem::new(order, "Long").estimated_duration(ESTIMATED_DURATION_MAX);
            agenda.add_item(&ids, input, Utc::now()).unwrap();
        }
        agenda
            .add_item(&ids, NewAgendaItem::new(4, "Short").estimated_duration(1), Utc::now())
            .unwrap();

        let summary = agenda.summary();
        assert_eq!(summary.item_count, 4);
        assert_eq!(summary.estimated_minutes, 3 * ESTIMATED_DURATION_MAX + 1);
    }
}

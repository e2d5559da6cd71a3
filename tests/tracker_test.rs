/// Integration tests for the agenda outcome tracker: ordering, vote outcome
/// derivation, duplicate detection, comments, status transitions and
/// approval rate.

use std::sync::Arc;
use std::thread;

use council::errors::TrackerError;
use council::models::agenda_item::{AgendaItemStatus, NewAgendaItem, ESTIMATED_DURATION_MAX};
use council::models::vote_result::{VoteOutcome, VotePolicy};

mod common;
use common::{add_item, tracker, tracker_with, MEETING_ID};

// ---------------------------------------------------------------------------
// Agenda ordering
// ---------------------------------------------------------------------------

#[test]
fn test_items_sorted_by_order_index_regardless_of_insertion_order() {
    let tracker = tracker();
    for order in [5, 0, 3, 10, 1] {
        add_item(&tracker, MEETING_ID, order);
    }

    let orders: Vec<i64> = tracker
        .agenda_items_for_meeting(MEETING_ID)
        .iter()
        .map(|v| v.item.order_index)
        .collect();
    assert_eq!(orders, vec![0, 1, 3, 5, 10]);
}

#[test]
fn test_duplicate_order_index_leaves_agenda_unchanged() {
    let tracker = tracker();
    add_item(&tracker, MEETING_ID, 1);
    add_item(&tracker, MEETING_ID, 2);
    let before = tracker.agenda_items_for_meeting(MEETING_ID);

    let err = tracker
        .add_agenda_item(MEETING_ID, NewAgendaItem::new(2, "Traffic plan"))
        .unwrap_err();
    assert_eq!(err, TrackerError::DuplicateOrder { meeting_id: MEETING_ID, order_index: 2 });

    let after = tracker.agenda_items_for_meeting(MEETING_ID);
    assert_eq!(before, after);
}

#[test]
fn test_same_order_index_allowed_in_different_meetings() {
    let tracker = tracker();
    add_item(&tracker, 1, 1);
    add_item(&tracker, 2, 1);
    assert_eq!(tracker.agenda_items_for_meeting(1).len(), 1);
    assert_eq!(tracker.agenda_items_for_meeting(2).len(), 1);
}

#[test]
fn test_add_item_validation() {
    let tracker = tracker();
    let err = tracker
        .add_agenda_item(MEETING_ID, NewAgendaItem::new(1, "   "))
        .unwrap_err();
    assert_eq!(err.kind(), "validation_error");

    let err = tracker
        .add_agenda_item(MEETING_ID, NewAgendaItem::new(-1, "Budget"))
        .unwrap_err();
    assert_eq!(err.kind(), "validation_error");

    assert!(tracker.agenda_items_for_meeting(MEETING_ID).is_empty());
}

#[test]
fn test_add_item_keeps_optional_fields() {
    let tracker = tracker();
    let item = tracker
        .add_agenda_item(
            MEETING_ID,
            NewAgendaItem::new(1, "2026 budget approval")
                .description("Annual municipal budget")
                .category("Finance")
                .presenter("Finance Director")
                .estimated_duration(45)
                .introduction_file("budget_intro.pdf")
                .decision_file("decision_12_2026.pdf"),
        )
        .expect("add item");

    assert_eq!(item.meeting_id, MEETING_ID);
    assert_eq!(item.status, AgendaItemStatus::Pending);
    assert_eq!(item.category.as_deref(), Some("Finance"));
    assert_eq!(item.estimated_duration, Some(45));
    assert_eq!(item.introduction_file.as_deref(), Some("budget_intro.pdf"));
    assert_eq!(item.decision_file.as_deref(), Some("decision_12_2026.pdf"));
}

#[test]
fn test_unknown_meeting_has_empty_agenda() {
    let tracker = tracker();
    assert!(tracker.agenda_items_for_meeting(99).is_empty());
}

// ---------------------------------------------------------------------------
// Vote results
// ---------------------------------------------------------------------------

#[test]
fn test_vote_approved_with_majority() {
    let tracker = tracker();
    let item = add_item(&tracker, MEETING_ID, 1);

    let result = tracker.record_vote_result(item.id, 10, 3, 2).expect("record vote");
    assert_eq!(result.total_votes, 15);
    assert_eq!(result.outcome, VoteOutcome::Approved);
    assert_eq!(result.agenda_item_id, item.id);
}

#[test]
fn test_vote_tie_is_rejected() {
    let tracker = tracker();
    let item = add_item(&tracker, MEETING_ID, 1);

    let result = tracker.record_vote_result(item.id, 5, 5, 0).expect("record vote");
    assert_eq!(result.outcome, VoteOutcome::Rejected);
}

#[test]
fn test_no_votes_is_no_quorum() {
    let tracker = tracker();
    let item = add_item(&tracker, MEETING_ID, 1);

    let result = tracker.record_vote_result(item.id, 0, 0, 0).expect("record vote");
    assert_eq!(result.total_votes, 0);
    assert_eq!(result.outcome, VoteOutcome::NoQuorum);
}

#[test]
fn test_configured_quorum_threshold() {
    let tracker = tracker_with(VotePolicy::with_quorum(11));
    let short = add_item(&tracker, MEETING_ID, 1);
    let enough = add_item(&tracker, MEETING_ID, 2);

    let result = tracker.record_vote_result(short.id, 8, 1, 1).unwrap();
    assert_eq!(result.outcome, VoteOutcome::NoQuorum);
    let result = tracker.record_vote_result(enough.id, 8, 2, 1).unwrap();
    assert_eq!(result.outcome, VoteOutcome::Approved);
}

#[test]
fn test_second_vote_is_rejected_and_first_kept() {
    let tracker = tracker();
    let item = add_item(&tracker, MEETING_ID, 1);
    let first = tracker.record_vote_result(item.id, 7, 2, 0).expect("first vote");

    let err = tracker.record_vote_result(item.id, 0, 9, 0).unwrap_err();
    assert_eq!(err, TrackerError::DuplicateVote { agenda_item_id: item.id });

    let stored = tracker.vote_summary(item.id).unwrap().expect("vote kept");
    assert_eq!(stored, first);
}

#[test]
fn test_negative_counts_rejected() {
    let tracker = tracker();
    let item = add_item(&tracker, MEETING_ID, 1);

    let err = tracker.record_vote_result(item.id, 3, -1, 0).unwrap_err();
    assert_eq!(err.kind(), "validation_error");
    assert_eq!(tracker.vote_summary(item.id), Ok(None));
}

#[test]
fn test_vote_for_unknown_item() {
    let tracker = tracker();
    let err = tracker.record_vote_result(404, 1, 0, 0).unwrap_err();
    assert_eq!(err.kind(), "not_found");
}

#[test]
fn test_vote_summary_absent_before_voting() {
    let tracker = tracker();
    let item = add_item(&tracker, MEETING_ID, 1);
    assert_eq!(tracker.vote_summary(item.id), Ok(None));
    assert!(tracker.vote_summary(12345).is_err());
}

#[test]
fn test_listing_includes_votes_and_comments() {
    let tracker = tracker();
    let voted = add_item(&tracker, MEETING_ID, 1);
    let open = add_item(&tracker, MEETING_ID, 2);
    tracker.record_vote_result(voted.id, 4, 1, 0).unwrap();
    tracker.add_comment(open.id, 3, "Nikos", "Needs a traffic study").unwrap();

    let items = tracker.agenda_items_for_meeting(MEETING_ID);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].vote_result.as_ref().map(|v| v.outcome), Some(VoteOutcome::Approved));
    assert!(items[0].comments.is_empty());
    assert!(items[1].vote_result.is_none());
    assert_eq!(items[1].comments.len(), 1);
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[test]
fn test_blank_comment_rejected() {
    let tracker = tracker();
    let item = add_item(&tracker, MEETING_ID, 1);
    tracker.add_comment(item.id, 3, "Nikos", "First").unwrap();

    for text in ["", "   ", "\n\t"] {
        let err = tracker.add_comment(item.id, 3, "Nikos", text).unwrap_err();
        assert_eq!(err.kind(), "validation_error");
    }
    assert_eq!(tracker.comments_for_item(item.id).unwrap().len(), 1);
}

#[test]
fn test_comments_kept_in_arrival_order() {
    let tracker = tracker();
    let item = add_item(&tracker, MEETING_ID, 1);
    let texts: Vec<String> = (1..=20).map(|i| format!("comment {i}")).collect();
    for (i, text) in texts.iter().enumerate() {
        tracker
            .add_comment(item.id, i as i64, &format!("user {i}"), text)
            .expect("add comment");
    }

    let stored: Vec<String> = tracker
        .comments_for_item(item.id)
        .unwrap()
        .into_iter()
        .map(|c| c.text)
        .collect();
    assert_eq!(stored, texts);
}

#[test]
fn test_comment_on_unknown_item() {
    let tracker = tracker();
    let err = tracker.add_comment(77, 1, "Eleni", "Hello").unwrap_err();
    assert_eq!(err.kind(), "not_found");
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

#[test]
fn test_status_lifecycle() {
    let tracker = tracker();
    let item = add_item(&tracker, MEETING_ID, 1);

    let item = tracker
        .update_agenda_item_status(item.id, AgendaItemStatus::InProgress)
        .unwrap();
    assert_eq!(item.status, AgendaItemStatus::InProgress);
    let item = tracker
        .update_agenda_item_status(item.id, AgendaItemStatus::Completed)
        .unwrap();
    assert_eq!(item.status, AgendaItemStatus::Completed);
    assert!(item.updated_at >= item.created_at);

    let err = tracker
        .update_agenda_item_status(item.id, AgendaItemStatus::Deferred)
        .unwrap_err();
    assert_eq!(err.kind(), "invalid_state");
}

#[test]
fn test_pending_cannot_jump_to_completed() {
    let tracker = tracker();
    let item = add_item(&tracker, MEETING_ID, 1);
    let err = tracker
        .update_agenda_item_status(item.id, AgendaItemStatus::Completed)
        .unwrap_err();
    assert_eq!(err.kind(), "invalid_state");
}

#[test]
fn test_completion_requires_vote_for_configured_category() {
    let policy = VotePolicy {
        vote_required_categories: vec!["Finance".to_string()],
        ..VotePolicy::default()
    };
    let tracker = tracker_with(policy);
    let decision = tracker
        .add_agenda_item(MEETING_ID, NewAgendaItem::new(1, "Budget").category("finance"))
        .unwrap();
    let briefing = tracker
        .add_agenda_item(MEETING_ID, NewAgendaItem::new(2, "Mayor's briefing").category("Information"))
        .unwrap();

    for id in [decision.id, briefing.id] {
        tracker.update_agenda_item_status(id, AgendaItemStatus::InProgress).unwrap();
    }

    let err = tracker
        .update_agenda_item_status(decision.id, AgendaItemStatus::Completed)
        .unwrap_err();
    assert_eq!(err.kind(), "invalid_state");
    assert!(tracker
        .update_agenda_item_status(briefing.id, AgendaItemStatus::Completed)
        .is_ok());

    tracker.record_vote_result(decision.id, 6, 2, 1).unwrap();
    let done = tracker
        .update_agenda_item_status(decision.id, AgendaItemStatus::Completed)
        .unwrap();
    assert_eq!(done.status, AgendaItemStatus::Completed);
}

#[test]
fn test_no_vote_after_completion() {
    let tracker = tracker();
    let item = add_item(&tracker, MEETING_ID, 1);
    tracker.update_agenda_item_status(item.id, AgendaItemStatus::InProgress).unwrap();
    tracker.update_agenda_item_status(item.id, AgendaItemStatus::Completed).unwrap();

    let err = tracker.record_vote_result(item.id, 3, 0, 0).unwrap_err();
    assert_eq!(err.kind(), "invalid_state");
}

// ---------------------------------------------------------------------------
// Approval rate and summary
// ---------------------------------------------------------------------------

#[test]
fn test_approval_rate_half() {
    let tracker = tracker();
    let approved = add_item(&tracker, MEETING_ID, 1);
    let rejected = add_item(&tracker, MEETING_ID, 2);
    add_item(&tracker, MEETING_ID, 3);

    tracker.record_vote_result(approved.id, 9, 1, 0).unwrap();
    tracker.record_vote_result(rejected.id, 1, 9, 0).unwrap();

    let rate = tracker.meeting_approval_rate(MEETING_ID).expect("rate defined");
    assert_eq!(rate.approved, 1);
    assert_eq!(rate.voted, 2);
    assert_eq!(rate.value(), 0.5);
}

#[test]
fn test_approval_rate_undefined_without_votes() {
    let tracker = tracker();
    add_item(&tracker, MEETING_ID, 1);
    assert_eq!(tracker.meeting_approval_rate(MEETING_ID), None);
    assert_eq!(tracker.meeting_approval_rate(999), None);
}

#[test]
fn test_approval_rate_zero_is_not_undefined() {
    let tracker = tracker();
    let item = add_item(&tracker, MEETING_ID, 1);
    tracker.record_vote_result(item.id, 0, 0, 0).unwrap();

    let rate = tracker.meeting_approval_rate(MEETING_ID).expect("rate defined");
    assert_eq!(rate.value(), 0.0);
}

#[test]
fn test_meeting_summary() {
    let tracker = tracker();
    let a = tracker
        .add_agenda_item(MEETING_ID, NewAgendaItem::new(1, "A").estimated_duration(30))
        .unwrap();
    let b = tracker
        .add_agenda_item(MEETING_ID, NewAgendaItem::new(2, "B").estimated_duration(15))
        .unwrap();
    tracker.record_vote_result(a.id, 3, 4, 0).unwrap();
    tracker.update_agenda_item_status(b.id, AgendaItemStatus::Deferred).unwrap();

    let summary = tracker.meeting_summary(MEETING_ID);
    assert_eq!(summary.item_count, 2);
    assert_eq!(summary.pending, 1);
    assert_eq!(summary.deferred, 1);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.estimated_minutes, 45);
    assert_eq!(summary.approval_rate.map(|r| r.value()), Some(0.0));

    let empty = tracker.meeting_summary(42);
    assert_eq!(empty.item_count, 0);
    assert_eq!(empty.approval_rate, None);
}

#[test]
fn test_meeting_summary_with_out_of_range_duration() {
    let tracker = tracker();
    let err = tracker
        .add_agenda_item(MEETING_ID, NewAgendaItem::new(1, "A").estimated_duration(i64::MAX))
        .unwrap_err();
    assert!(matches!(err, TrackerError::Validation(_)));

    tracker
        .add_agenda_item(MEETING_ID, NewAgendaItem::new(1, "A").estimated_duration(ESTIMATED_DURATION_MAX))
        .unwrap();
    tracker
        .add_agenda_item(MEETING_ID, NewAgendaItem::new(2, "B").estimated_duration(1))
        .unwrap();

    let summary = tracker.meeting_summary(MEETING_ID);
    assert_eq!(summary.item_count, 2);
    assert_eq!(summary.estimated_minutes, ESTIMATED_DURATION_MAX + 1);
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[test]
fn test_concurrent_same_order_index_single_winner() {
    let tracker = Arc::new(tracker());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let tracker = Arc::clone(&tracker);
            thread::spawn(move || {
                tracker.add_agenda_item(MEETING_ID, NewAgendaItem::new(1, format!("Contender {i}")))
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("thread panicked"))
        .collect();
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| e.kind() == "duplicate_order"));
    assert_eq!(tracker.agenda_items_for_meeting(MEETING_ID).len(), 1);
}

#[test]
fn test_concurrent_votes_single_winner() {
    let tracker = Arc::new(tracker());
    let item = add_item(&tracker, MEETING_ID, 1);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let tracker = Arc::clone(&tracker);
            thread::spawn(move || tracker.record_vote_result(item.id, i, 0, 0))
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|h| h.join().expect("thread panicked"))
        .filter(|r| r.is_ok())
        .count();
    assert_eq!(successes, 1);
}

#[test]
fn test_concurrent_comments_all_kept() {
    let tracker = Arc::new(tracker());
    let item = add_item(&tracker, MEETING_ID, 1);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let tracker = Arc::clone(&tracker);
            thread::spawn(move || {
                for n in 0..25 {
                    tracker
                        .add_comment(item.id, t, "writer", &format!("{t}-{n}"))
                        .expect("add comment");
                }
            })
        })
        .collect();
    for h in handles {
        h.join().expect("thread panicked");
    }

    let comments = tracker.comments_for_item(item.id).unwrap();
    assert_eq!(comments.len(), 100);
    // Per-writer order is preserved.
    for t in 0..4 {
        let mine: Vec<String> = comments
            .iter()
            .filter(|c| c.author_user_id == t)
            .map(|c| c.text.clone())
            .collect();
        let expected: Vec<String> = (0..25).map(|n| format!("{t}-{n}")).collect();
        assert_eq!(mine, expected);
    }
}

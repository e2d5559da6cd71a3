use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::auth::validate;
use crate::errors::TrackerError;

/// Terminal classification of a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteOutcome {
    Approved,
    Rejected,
    NoQuorum,
}

impl VoteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteOutcome::Approved => "approved",
            VoteOutcome::Rejected => "rejected",
            VoteOutcome::NoQuorum => "no_quorum",
        }
    }
}

impl fmt::Display for VoteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw counts submitted when voting on an agenda item concludes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoteTally {
    #[serde(default)]
    pub votes_for: i64,
    #[serde(default)]
    pub votes_against: i64,
    #[serde(default)]
    pub votes_abstain: i64,
}

impl VoteTally {
    pub fn new(votes_for: i64, votes_against: i64, votes_abstain: i64) -> Self {
        Self { votes_for, votes_against, votes_abstain }
    }

    /// Check the counts and return their sum.
    pub fn validated_total(&self) -> Result<i64, TrackerError> {
        let errors: Vec<String> = [
            validate::validate_non_negative(self.votes_for, "Votes for"),
            validate::validate_non_negative(self.votes_against, "Votes against"),
            validate::validate_non_negative(self.votes_abstain, "Votes abstain"),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !errors.is_empty() {
            return Err(TrackerError::Validation(errors.join("; ")));
        }

        self.votes_for
            .checked_add(self.votes_against)
            .and_then(|sum| sum.checked_add(self.votes_abstain))
            .ok_or_else(|| TrackerError::Validation("Vote total is out of range".to_string()))
    }
}

/// Recorded tally for one agenda item's vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResult {
    pub id: i64,
    pub agenda_item_id: i64,
    pub votes_for: i64,
    pub votes_against: i64,
    pub votes_abstain: i64,
    pub total_votes: i64,
    pub outcome: VoteOutcome,
    pub voted_at: DateTime<Utc>,
}

/// Share of voted agenda items that were approved, kept as an exact ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApprovalRate {
    pub approved: usize,
    pub voted: usize,
}

impl ApprovalRate {
    /// `None` when nothing has been voted on.
    pub fn from_counts(approved: usize, voted: usize) -> Option<Self> {
        (voted > 0).then_some(Self { approved, voted })
    }

    pub fn value(&self) -> f64 {
        self.approved as f64 / self.voted as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_total() {
        assert_eq!(VoteTally::new(10, 3, 2).validated_total(), Ok(15));
        assert_eq!(VoteTally::default().validated_total(), Ok(0));
    }

    #[test]
    fn tally_rejects_negative_counts() {
        let err = VoteTally::new(1, -1, 0).validated_total().unwrap_err();
        assert_eq!(err.kind(), "validation_error");
    }

    #[test]
    fn tally_rejects_overflow() {
        assert!(VoteTally::new(i64::MAX, 1, 0).validated_total().is_err());
    }

    #[test]
    fn outcome_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&VoteOutcome::NoQuorum).unwrap(), "\"no_quorum\"");
        let parsed: VoteOutcome = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(parsed, VoteOutcome::Approved);
    }

    #[test]
    fn approval_rate_is_exact() {
        assert_eq!(ApprovalRate::from_counts(0, 0), None);
        let rate = ApprovalRate::from_counts(1, 2).unwrap();
        assert_eq!(rate.value(), 0.5);
        assert_eq!(ApprovalRate::from_counts(0, 3).unwrap().value(), 0.0);
    }
}

use serde::{Deserialize, Serialize};

use super::types::{VoteOutcome, VoteTally};

pub const DEFAULT_QUORUM_THRESHOLD: i64 = 1;

/// Rules used to turn a tally into an outcome, and to decide which agenda
/// items cannot be completed without a vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotePolicy {
    /// Minimum total participation (for + against + abstain).
    pub quorum_threshold: i64,
    /// Categories matched case-insensitively.
    pub vote_required_categories: Vec<String>,
}

impl Default for VotePolicy {
    fn default() -> Self {
        Self {
            quorum_threshold: DEFAULT_QUORUM_THRESHOLD,
            vote_required_categories: Vec::new(),
        }
    }
}

impl VotePolicy {
    pub fn with_quorum(quorum_threshold: i64) -> Self {
        Self { quorum_threshold, ..Self::default() }
    }

    /// Below quorum the vote is void; otherwise a strict majority of `for`
    /// over `against` approves and a tie rejects. Abstentions count toward
    /// quorum only.
    pub fn derive_outcome(&self, tally: &VoteTally, total_votes: i64) -> VoteOutcome {
        if total_votes < self.quorum_threshold {
            VoteOutcome::NoQuorum
        } else if tally.votes_for > tally.votes_against {
            VoteOutcome::Approved
        } else {
            VoteOutcome::Rejected
        }
    }

    pub fn requires_vote(&self, category: Option<&str>) -> bool {
        let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) else {
            return false;
        };
        let category = category.to_lowercase();
        self.vote_required_categories
            .iter()
            .any(|c| c.trim().to_lowercase() == category)
    }
}

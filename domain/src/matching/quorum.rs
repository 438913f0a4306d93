//! Approval threshold for declaring a match

use serde::{Deserialize, Serialize};

/// Minimum number of distinct approvers that turns a candidate into a match
///
/// The default is a pairwise quorum of 2: as soon as any two
/// participants approve the same movie, the group has something it can
/// watch, regardless of group size. This is a deliberate policy choice.
/// [`MatchQuorum::majority_of`] exists for groups that want stricter
/// agreement, but nothing in the server path uses it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchQuorum(usize);

impl Default for MatchQuorum {
    fn default() -> Self {
        MatchQuorum(2)
    }
}

impl MatchQuorum {
    /// A quorum requiring exactly `n` distinct approvers (minimum 1)
    pub fn of(n: usize) -> Self {
        MatchQuorum(n.max(1))
    }

    /// A quorum requiring more than half of `member_count` approvers
    pub fn majority_of(member_count: usize) -> Self {
        MatchQuorum((member_count / 2 + 1).max(1))
    }

    /// Check whether an approver set of this size reaches the quorum
    pub fn is_met(&self, approvals: usize) -> bool {
        approvals >= self.0
    }

    pub fn threshold(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for MatchQuorum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} approvals", self.0)
    }
}

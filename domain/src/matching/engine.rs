//! Candidate consensus engine
//!
//! Every participant's client runs one [`MatchEngine`] over the same
//! deck and feeds it every vote relayed through the session channel.
//! Because all engines apply identical logic to the same event stream,
//! they converge on the same approval ledger and matched set without a
//! central referee.

use crate::matching::quorum::MatchQuorum;
use crate::movie::Movie;
use std::collections::{HashMap, HashSet};

/// Tracks votes over one deck and detects quorum agreement
#[derive(Debug, Default)]
pub struct MatchEngine {
    deck: Vec<Movie>,
    /// Candidate ids each participant has rendered a decision on
    seen: HashMap<String, HashSet<u64>>,
    /// Approval ledger: candidate id -> distinct approving participants
    approvals: HashMap<u64, HashSet<String>>,
    /// Candidates that have reached quorum
    matched: HashSet<u64>,
    quorum: MatchQuorum,
}

impl MatchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quorum(quorum: MatchQuorum) -> Self {
        Self {
            quorum,
            ..Self::default()
        }
    }

    /// Replace the deck for a new round.
    ///
    /// Clears the approval ledger, all seen sets, and the matched set
    /// together; votes from a previous deck must not leak into the new
    /// round.
    pub fn load_deck(&mut self, deck: Vec<Movie>) {
        self.deck = deck;
        self.seen.clear();
        self.approvals.clear();
        self.matched.clear();
    }

    pub fn deck(&self) -> &[Movie] {
        &self.deck
    }

    pub fn quorum(&self) -> MatchQuorum {
        self.quorum
    }

    /// The next candidate to show `participant_id`, or `None` when the
    /// deck is exhausted for them.
    ///
    /// Peer-endorsed candidates come first: an unseen, unmatched movie
    /// that some other participant already approved is the fastest path
    /// to a match. Among equals, deck order wins. Otherwise fall back to
    /// the first unseen, unmatched movie in deck order.
    pub fn current_for(&self, participant_id: &str) -> Option<&Movie> {
        let seen = self.seen.get(participant_id);
        let votable = |movie: &Movie| {
            !self.matched.contains(&movie.id) && seen.is_none_or(|s| !s.contains(&movie.id))
        };
        let peer_endorsed = |movie: &Movie| {
            self.approvals.get(&movie.id).is_some_and(|approvers| {
                !approvers.is_empty() && !approvers.contains(participant_id)
            })
        };

        self.deck
            .iter()
            .find(|&m| votable(m) && peer_endorsed(m))
            .or_else(|| self.deck.iter().find(|&m| votable(m)))
    }

    /// Record one participant's decision on a candidate.
    ///
    /// Marks the candidate seen for that participant unconditionally.
    /// Approvals accumulate as a set, so replayed votes from the same
    /// participant change nothing. Votes for ids outside the deck still
    /// create ledger entries; absence is not an error here.
    pub fn record_vote(&mut self, movie_id: u64, participant_id: &str, approved: bool) {
        self.seen
            .entry(participant_id.to_string())
            .or_default()
            .insert(movie_id);
        if approved {
            self.approvals
                .entry(movie_id)
                .or_default()
                .insert(participant_id.to_string());
        }
    }

    /// Candidates that newly reached quorum since the last call.
    ///
    /// Each id enters the matched set exactly once; calling again with
    /// no intervening votes returns an empty list. Ordering among
    /// simultaneous matches is unspecified.
    pub fn check_for_new_matches(&mut self) -> Vec<u64> {
        let new_matches: Vec<u64> = self
            .approvals
            .iter()
            .filter(|(id, approvers)| {
                self.quorum.is_met(approvers.len()) && !self.matched.contains(*id)
            })
            .map(|(id, _)| *id)
            .collect();

        self.matched.extend(new_matches.iter().copied());
        new_matches
    }

    /// Ids currently in the matched set
    pub fn matched_ids(&self) -> &HashSet<u64> {
        &self.matched
    }

    /// Deck entries for matched ids, in deck order
    pub fn matched_movies(&self) -> Vec<&Movie> {
        self.deck
            .iter()
            .filter(|m| self.matched.contains(&m.id))
            .collect()
    }

    /// How many candidates this participant has decided on
    pub fn seen_count(&self, participant_id: &str) -> usize {
        self.seen.get(participant_id).map_or(0, HashSet::len)
    }

    /// Deck entries this participant approved, in deck order
    pub fn approved_by(&self, participant_id: &str) -> Vec<&Movie> {
        self.deck
            .iter()
            .filter(|m| {
                self.approvals
                    .get(&m.id)
                    .is_some_and(|approvers| approvers.contains(participant_id))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(ids: &[u64]) -> Vec<Movie> {
        ids.iter().map(|&id| Movie::new(id, format!("movie-{id}"))).collect()
    }

    fn engine_with(ids: &[u64]) -> MatchEngine {
        let mut engine = MatchEngine::new();
        engine.load_deck(deck(ids));
        engine
    }

    #[test]
    fn test_current_follows_deck_order() {
        let engine = engine_with(&[101, 202, 303]);
        assert_eq!(engine.current_for("u1").unwrap().id, 101);
    }

    #[test]
    fn test_current_skips_seen() {
        let mut engine = engine_with(&[101, 202, 303]);
        engine.record_vote(101, "u1", false);
        assert_eq!(engine.current_for("u1").unwrap().id, 202);
        // u2 has seen nothing
        assert_eq!(engine.current_for("u2").unwrap().id, 101);
    }

    #[test]
    fn test_peer_endorsed_candidate_jumps_the_queue() {
        let mut engine = engine_with(&[101, 202, 303]);
        engine.record_vote(303, "u2", true);
        assert_eq!(engine.current_for("u1").unwrap().id, 303);
        // u2's own approval does not endorse it back to u2
        assert_eq!(engine.current_for("u2").unwrap().id, 101);
    }

    #[test]
    fn test_peer_endorsed_tie_breaks_by_deck_order() {
        let mut engine = engine_with(&[101, 202, 303]);
        engine.record_vote(303, "u2", true);
        engine.record_vote(202, "u2", true);
        assert_eq!(engine.current_for("u1").unwrap().id, 202);
    }

    #[test]
    fn test_current_never_returns_matched() {
        let mut engine = engine_with(&[101, 202]);
        engine.record_vote(101, "u1", true);
        engine.record_vote(101, "u2", true);
        engine.check_for_new_matches();

        assert_eq!(engine.current_for("u3").unwrap().id, 202);
        // Exhaustion: u1 saw 101, 202 is all that's left
        engine.record_vote(202, "u1", false);
        assert!(engine.current_for("u1").is_none());
    }

    #[test]
    fn test_match_detected_at_quorum() {
        let mut engine = engine_with(&[101, 202]);

        engine.record_vote(101, "u1", true);
        assert_eq!(engine.check_for_new_matches(), Vec::<u64>::new());

        engine.record_vote(101, "u2", true);
        assert_eq!(engine.check_for_new_matches(), vec![101]);
    }

    #[test]
    fn test_check_is_idempotent() {
        let mut engine = engine_with(&[101]);
        engine.record_vote(101, "u1", true);
        engine.record_vote(101, "u2", true);

        assert_eq!(engine.check_for_new_matches(), vec![101]);
        assert!(engine.check_for_new_matches().is_empty());
        assert!(engine.check_for_new_matches().is_empty());
    }

    #[test]
    fn test_repeat_approvals_do_not_double_count() {
        let mut engine = engine_with(&[101]);
        engine.record_vote(101, "u1", true);
        engine.record_vote(101, "u1", true);
        assert!(engine.check_for_new_matches().is_empty());

        engine.record_vote(101, "u2", true);
        assert_eq!(engine.check_for_new_matches(), vec![101]);
        // A third approver does not re-match
        engine.record_vote(101, "u3", true);
        assert!(engine.check_for_new_matches().is_empty());
    }

    #[test]
    fn test_two_participant_session_scenario() {
        // u1 and u2 swipe through a 2-movie deck
        let mut engine = engine_with(&[101, 202]);

        engine.record_vote(101, "u1", true);
        assert!(engine.check_for_new_matches().is_empty());
        engine.record_vote(101, "u2", true);
        assert_eq!(engine.check_for_new_matches(), vec![101]);

        engine.record_vote(202, "u1", true);
        assert!(engine.check_for_new_matches().is_empty());
        engine.record_vote(202, "u2", false);
        assert!(engine.check_for_new_matches().is_empty());

        assert_eq!(engine.matched_ids().len(), 1);
        assert!(engine.matched_ids().contains(&101));
    }

    #[test]
    fn test_vote_on_unknown_id_creates_ledger_entry() {
        let mut engine = engine_with(&[101]);
        engine.record_vote(999, "u1", true);
        engine.record_vote(999, "u2", true);
        // Quorum on an off-deck id still registers as a match
        assert_eq!(engine.check_for_new_matches(), vec![999]);
        assert!(engine.matched_movies().is_empty());
    }

    #[test]
    fn test_load_deck_clears_round_state() {
        let mut engine = engine_with(&[101]);
        engine.record_vote(101, "u1", true);
        engine.record_vote(101, "u2", true);
        engine.check_for_new_matches();

        engine.load_deck(deck(&[101, 202]));
        assert_eq!(engine.seen_count("u1"), 0);
        assert!(engine.matched_ids().is_empty());
        // 101 is votable again in the new round
        assert_eq!(engine.current_for("u1").unwrap().id, 101);
    }

    #[test]
    fn test_approved_by_and_seen_count() {
        let mut engine = engine_with(&[101, 202, 303]);
        engine.record_vote(101, "u1", true);
        engine.record_vote(202, "u1", false);
        engine.record_vote(303, "u1", true);

        assert_eq!(engine.seen_count("u1"), 3);
        let approved: Vec<u64> = engine.approved_by("u1").iter().map(|m| m.id).collect();
        assert_eq!(approved, vec![101, 303]);
    }

    #[test]
    fn test_custom_quorum() {
        let mut engine = MatchEngine::with_quorum(MatchQuorum::of(3));
        engine.load_deck(deck(&[101]));
        engine.record_vote(101, "u1", true);
        engine.record_vote(101, "u2", true);
        assert!(engine.check_for_new_matches().is_empty());
        engine.record_vote(101, "u3", true);
        assert_eq!(engine.check_for_new_matches(), vec![101]);
    }
}

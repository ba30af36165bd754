//! # Ranking
//!
//! Standard competition ranking over a day's vote counts and the point table
//! that turns ranks into lifetime score.
//!
//! Equal vote counts share a rank and the following rank skips the tied
//! positions: counts `[10, 10, 5, 3]` rank as `[1, 1, 3, 4]`.
//!
//! | Rank | Placement bonus |
//! |------|-----------------|
//! | 1 | 50 |
//! | 2 | 30 |
//! | 3 | 15 |
//! | 4 | 5 |
//! | 5 | 3 |
//! | 6-10 | 1 |
//! | 11+ | 0 |
//!
//! Every participant also gets one participation point.
use serde::Serialize;

use crate::models::Submission;

pub const PLACEMENT_POINTS: [u64; 5] = [50, 30, 15, 5, 3];
pub const TAIL_POINTS: u64 = 1;
pub const TAIL_LAST_RANK: usize = 10;
pub const PARTICIPATION_POINTS: u64 = 1;

pub fn placement_bonus(rank: usize) -> u64 {
    match rank {
        0 => 0,
        r if r <= PLACEMENT_POINTS.len() => PLACEMENT_POINTS[r - 1],
        r if r <= TAIL_LAST_RANK => TAIL_POINTS,
        _ => 0,
    }
}

/// One submission's result for a finalized day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub submission_id: String,
    pub user_id: String,
    pub username: String,
    pub votes: u64,
    pub rank: usize,
    pub bonus: u64,
    pub total: u64,
}

impl Placement {
    pub fn is_win(&self) -> bool {
        self.rank == 1
    }
}

/// Ranks assigned to counts already sorted in descending order.
pub fn competition_ranks(sorted_votes: &[u64]) -> Vec<usize> {
    let mut ranks = Vec::with_capacity(sorted_votes.len());

    for (index, votes) in sorted_votes.iter().enumerate() {
        let rank = match (index, ranks.last()) {
            (i, Some(&previous)) if sorted_votes[i - 1] == *votes => previous,
            _ => index + 1,
        };
        ranks.push(rank);
    }

    ranks
}

/// Orders every submission by votes and awards each one.
///
/// Ties in votes are listed by submission time, then id, so the listing is
/// deterministic; tied entries share a rank regardless of listing order.
pub fn standings<'a>(entries: impl IntoIterator<Item = (&'a Submission, u64)>) -> Vec<Placement> {
    let mut entries: Vec<(&Submission, u64)> = entries.into_iter().collect();

    entries.sort_by(|(a, a_votes), (b, b_votes)| {
        b_votes
            .cmp(a_votes)
            .then_with(|| a.submitted_at.cmp(&b.submitted_at))
            .then_with(|| a.id.cmp(&b.id))
    });

    let votes: Vec<u64> = entries.iter().map(|(_, votes)| *votes).collect();
    let ranks = competition_ranks(&votes);

    entries
        .into_iter()
        .zip(ranks)
        .map(|((submission, votes), rank)| {
            let bonus = placement_bonus(rank);

            Placement {
                submission_id: submission.id.clone(),
                user_id: submission.user_id.clone(),
                username: submission.username.clone(),
                votes,
                rank,
                bonus,
                total: bonus + PARTICIPATION_POINTS,
            }
        })
        .collect()
}

//! # Finalization
//!
//! Converts one day's vote tallies into lifetime score and wins, at most once
//! per day no matter how many callers race or retry.
//!
//! ## Steps
//!
//! 1. Fast path: an existing `finalized:<day>` marker means nothing to do.
//! 2. Gate: `SET finalized:<day> 1 NX`. Losing the set is the normal outcome for
//!    every caller but one and is not an error.
//! 3. Load the day's submissions. None means the day stays an empty no-op forever.
//! 4. Join with `leaderboard:<day>`; submissions nobody voted for rank with 0 votes.
//! 5. Rank with [`ranking::standings`] and apply each award with atomic increments.
//!    Every rank-1 entry records a win.
//!
//! ## Marker ordering
//!
//! The marker is taken before awards are applied. A crash between the gate and
//! the last increment leaves the remaining participants unawarded and the day
//! marked, with no re-run path. Taking the marker last would instead let two
//! callers award the same day during the window. Awards here are at-most-once.
//!
//! Votes accepted after a day is finalized still land in that day's tally but
//! never reach lifetime score.
use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    Contest,
    day::Day,
    error::Result,
    keys,
    ranking::{self, Placement},
    score_to_count,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "placements", rename_all = "camelCase")]
pub enum Finalization {
    /// Another call already holds the marker for this day.
    AlreadyFinalized,
    /// Marker taken, no submissions to award.
    Empty,
    Awarded(Vec<Placement>),
}

impl Contest {
    pub async fn finalize(&self, day: Day) -> Result<Finalization> {
        let marker = keys::finalized(day);

        if self.store().get(&marker).await?.is_some() {
            debug!(%day, "Day already finalized");
            return Ok(Finalization::AlreadyFinalized);
        }

        if !self.store().set_nx(&marker, "1", None).await? {
            debug!(%day, "Lost finalization race");
            return Ok(Finalization::AlreadyFinalized);
        }

        let submissions = self.submissions_for_voting(day).await?;
        if submissions.is_empty() {
            info!(%day, "No submissions, nothing to finalize");
            return Ok(Finalization::Empty);
        }

        let tallies: HashMap<String, u64> = self
            .store()
            .zrange_desc(&keys::daily_leaderboard(day), None)
            .await?
            .into_iter()
            .map(|(member, score)| (member, score_to_count(score)))
            .collect();

        let placements = ranking::standings(
            submissions
                .iter()
                .map(|submission| (submission, tallies.get(&submission.id).copied().unwrap_or(0))),
        );

        for placement in &placements {
            self.add_lifetime_score(&placement.user_id, placement.total)
                .await?;

            if placement.is_win() {
                self.record_win(&placement.user_id).await?;
            }

            info!(
                %day,
                user = %placement.user_id,
                username = %placement.username,
                rank = placement.rank,
                votes = placement.votes,
                placement = placement.bonus,
                participation = ranking::PARTICIPATION_POINTS,
                total = placement.total,
                win = placement.is_win(),
                "Awarded placement"
            );
        }

        info!(%day, participants = placements.len(), "Finalized day");

        Ok(Finalization::Awarded(placements))
    }

    pub async fn is_finalized(&self, day: Day) -> Result<bool> {
        Ok(self.store().get(&keys::finalized(day)).await?.is_some())
    }
}

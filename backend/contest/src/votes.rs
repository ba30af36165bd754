//! # Vote Ledger
//!
//! One vote per `(voter, submission, day)`, never on the voter's own entry.
//!
//! ## Acceptance
//!
//! 1. The submission must exist for the day and belong to someone else.
//! 2. Cooldown: `SET ratelimit:vote:<voter> NX PX <cooldown>`. A live marker rejects the
//!    request without looking at vote state.
//! 3. `ZADD votes:<day>:<submission> NX <now> <voter>` decides first-vote-ness. Two racing
//!    requests from the same voter cannot both pass; only the winner continues.
//! 4. `ZINCRBY leaderboard:<day> 1 <submission>`.
//!
//! Rejections are ordinary [`VoteOutcome`] values. Only store failures are errors.
use tracing::debug;

use crate::{
    Contest,
    day::Day,
    error::Result,
    keys,
    models::{VoteOutcome, VoteStatus},
    now_millis, score_to_count,
};

impl Contest {
    pub async fn cast_vote(&self, voter_id: &str, submission_id: &str, day: Day) -> Result<VoteOutcome> {
        self.record_vote(voter_id, submission_id, day, true).await
    }

    /// Administrative vote that skips the cooldown but keeps every other check.
    /// Callers gate access.
    pub async fn simulate_vote(
        &self,
        voter_id: &str,
        submission_id: &str,
        day: Day,
    ) -> Result<VoteOutcome> {
        self.record_vote(voter_id, submission_id, day, false).await
    }

    async fn record_vote(
        &self,
        voter_id: &str,
        submission_id: &str,
        day: Day,
        cooldown: bool,
    ) -> Result<VoteOutcome> {
        let Some(submission) = self.submission(submission_id, day).await? else {
            return Ok(VoteOutcome::UnknownSubmission);
        };

        if submission.user_id == voter_id {
            return Ok(VoteOutcome::OwnSubmission);
        }

        let window = self.settings().vote_cooldown;
        if cooldown
            && !window.is_zero()
            && !self
                .store()
                .set_nx(&keys::vote_cooldown(voter_id), "1", Some(window))
                .await?
        {
            debug!(voter = %voter_id, "Vote rate limited");
            return Ok(VoteOutcome::RateLimited);
        }

        let first = self
            .store()
            .zadd_nx(&keys::voters(day, submission_id), voter_id, now_millis() as f64)
            .await?;

        if !first {
            return Ok(VoteOutcome::AlreadyVoted);
        }

        let votes = self
            .store()
            .zincr_by(&keys::daily_leaderboard(day), submission_id, 1.0)
            .await?;

        debug!(%day, voter = %voter_id, submission = %submission_id, votes, "Vote accepted");

        Ok(VoteOutcome::Accepted {
            votes: score_to_count(votes),
        })
    }

    pub async fn has_voted(&self, voter_id: &str, submission_id: &str, day: Day) -> Result<bool> {
        Ok(self
            .store()
            .zscore(&keys::voters(day, submission_id), voter_id)
            .await?
            .is_some())
    }

    pub async fn is_own_submission(&self, user_id: &str, submission_id: &str, day: Day) -> Result<bool> {
        Ok(self
            .submission(submission_id, day)
            .await?
            .is_some_and(|submission| submission.user_id == user_id))
    }

    pub async fn vote_count(&self, submission_id: &str, day: Day) -> Result<u64> {
        self.store().zcard(&keys::voters(day, submission_id)).await
    }

    pub async fn vote_status(&self, user_id: &str, submission_id: &str, day: Day) -> Result<VoteStatus> {
        Ok(VoteStatus {
            has_voted: self.has_voted(user_id, submission_id, day).await?,
            is_own_submission: self.is_own_submission(user_id, submission_id, day).await?,
            vote_count: self.vote_count(submission_id, day).await?,
        })
    }
}

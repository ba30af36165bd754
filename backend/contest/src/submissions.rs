//! # Submission Ledger
//!
//! One meme per user per day, stored as JSON in the `submissions:<day>` hash
//! and mirrored by a `user-submitted:<day>:<user>` flag for O(1) lookups.
//!
//! The flag is taken with set-if-absent before the record is written, so two
//! racing submissions from the same user cannot both land.
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    Contest,
    day::Day,
    error::{Error, Result},
    keys,
    models::{EntryOutcome, NewSubmission, Submission, SubmitOutcome},
    now_millis, score_to_count,
};

const SUBMISSION_ID_PREFIX: &str = "sub_";

fn decode(day: Day, raw: &str) -> Result<Submission> {
    serde_json::from_str(raw).map_err(|source| Error::CorruptRecord {
        key: keys::submissions(day),
        source,
    })
}

impl Contest {
    /// A user's daily entry: stores the submission, refreshes their username
    /// and advances their streak.
    pub async fn submit(&self, day: Day, new: NewSubmission) -> Result<EntryOutcome> {
        let username = new.username.clone();

        let submission = match self.store_submission(day, new).await? {
            SubmitOutcome::Stored(submission) => submission,
            SubmitOutcome::AlreadySubmitted => return Ok(EntryOutcome::AlreadySubmitted),
        };

        self.set_username(&submission.user_id, &username).await?;
        let streak = self.update_streak(&submission.user_id, day).await?;

        Ok(EntryOutcome::Entered { submission, streak })
    }

    pub async fn store_submission(&self, day: Day, new: NewSubmission) -> Result<SubmitOutcome> {
        let flag = keys::user_submitted(day, &new.user_id);

        if !self.store().set_nx(&flag, "1", None).await? {
            return Ok(SubmitOutcome::AlreadySubmitted);
        }

        let submission = Submission {
            id: format!("{SUBMISSION_ID_PREFIX}{}", Uuid::new_v4()),
            user_id: new.user_id,
            username: new.username,
            image_url: new.image_url,
            caption: new.caption,
            submitted_at: now_millis(),
            overlays: (!new.overlays.is_empty()).then_some(new.overlays),
        };

        let record = serde_json::to_string(&submission).map_err(|source| Error::CorruptRecord {
            key: keys::submissions(day),
            source,
        })?;

        if let Err(e) = self
            .store()
            .hset(&keys::submissions(day), &[(submission.id.as_str(), record.as_str())])
            .await
        {
            // Release the flag so the user can retry once the store is back.
            if let Err(cleanup) = self.store().del(&flag).await {
                warn!(%day, user = %submission.user_id, "Failed to release submission flag: {cleanup}");
            }
            return Err(e);
        }

        info!(%day, submission = %submission.id, user = %submission.user_id, "Stored submission");

        Ok(SubmitOutcome::Stored(submission))
    }

    pub async fn submission(&self, id: &str, day: Day) -> Result<Option<Submission>> {
        self.store()
            .hget(&keys::submissions(day), id)
            .await?
            .map(|raw| decode(day, &raw))
            .transpose()
    }

    /// Every submission for `day`, oldest first.
    pub async fn submissions_for_voting(&self, day: Day) -> Result<Vec<Submission>> {
        let mut submissions = self
            .store()
            .hgetall(&keys::submissions(day))
            .await?
            .values()
            .map(|raw| decode(day, raw))
            .collect::<Result<Vec<_>>>()?;

        submissions.sort_by(|a, b| {
            a.submitted_at
                .cmp(&b.submitted_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(submissions)
    }

    pub async fn has_user_submitted(&self, user_id: &str, day: Day) -> Result<bool> {
        let flag = keys::user_submitted(day, user_id);

        if self.store().get(&flag).await?.is_some() {
            return Ok(true);
        }

        // Records written without the flag are found by scanning, then flagged.
        if self.user_submission_id(user_id, day).await?.is_some() {
            self.store().set(&flag, "1").await?;
            return Ok(true);
        }

        Ok(false)
    }

    pub async fn user_submission_id(&self, user_id: &str, day: Day) -> Result<Option<String>> {
        Ok(self
            .submissions_for_voting(day)
            .await?
            .into_iter()
            .find(|submission| submission.user_id == user_id)
            .map(|submission| submission.id))
    }

    /// Moderation removal. Drops the record, its tally and voters, and takes
    /// the submission's votes back out of the owner's lifetime score.
    pub async fn delete_submission(&self, id: &str, day: Day) -> Result<bool> {
        let Some(submission) = self.submission(id, day).await? else {
            return Ok(false);
        };

        let tally_key = keys::daily_leaderboard(day);
        let votes = self
            .store()
            .zscore(&tally_key, id)
            .await?
            .map_or(0, score_to_count);

        self.store().hdel(&keys::submissions(day), id).await?;
        self.store()
            .del(&keys::user_submitted(day, &submission.user_id))
            .await?;
        self.store().zrem(&tally_key, id).await?;
        self.store().del(&keys::voters(day, id)).await?;

        if votes > 0 {
            let remaining = self
                .store()
                .zincr_by(keys::LIFETIME_LEADERBOARD, &submission.user_id, -(votes as f64))
                .await?;

            if remaining < 0.0 {
                self.store()
                    .zincr_by(keys::LIFETIME_LEADERBOARD, &submission.user_id, -remaining)
                    .await?;
            }
        }

        info!(%day, submission = %id, user = %submission.user_id, votes, "Deleted submission");

        Ok(true)
    }
}

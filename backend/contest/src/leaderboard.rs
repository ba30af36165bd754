//! Read-only leaderboard queries. Missing usernames fall back to the raw user id.
use std::collections::HashSet;

use crate::{
    Contest,
    day::Day,
    error::Result,
    keys,
    models::{DailyEntry, LifetimeEntry, StreakEntry},
    score_to_count,
};

fn display_name(username: Option<String>, user_id: &str) -> String {
    username
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| user_id.to_string())
}

impl Contest {
    /// Top `limit` submissions by votes. When fewer than `limit` submissions
    /// have votes, the rest are filled with zero-vote submissions, oldest first.
    pub async fn daily_leaderboard(&self, day: Day, limit: usize) -> Result<Vec<DailyEntry>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let voted = self
            .store()
            .zrange_desc(&keys::daily_leaderboard(day), Some(limit))
            .await?;

        let mut entries = Vec::with_capacity(voted.len());
        let mut seen = HashSet::new();

        for (submission_id, score) in voted {
            // Tallies of removed submissions are skipped.
            let Some(submission) = self.submission(&submission_id, day).await? else {
                continue;
            };

            seen.insert(submission_id.clone());
            entries.push(DailyEntry {
                username: display_name(Some(submission.username), &submission.user_id),
                user_id: submission.user_id,
                submission_id,
                votes: score_to_count(score),
            });
        }

        if entries.len() < limit {
            for submission in self.submissions_for_voting(day).await? {
                if entries.len() >= limit {
                    break;
                }
                if !seen.insert(submission.id.clone()) {
                    continue;
                }

                entries.push(DailyEntry {
                    username: display_name(Some(submission.username), &submission.user_id),
                    user_id: submission.user_id,
                    submission_id: submission.id,
                    votes: 0,
                });
            }
        }

        Ok(entries)
    }

    pub async fn lifetime_leaderboard(&self, limit: usize) -> Result<Vec<LifetimeEntry>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let ranked = self
            .store()
            .zrange_desc(keys::LIFETIME_LEADERBOARD, Some(limit))
            .await?;

        let mut entries = Vec::with_capacity(ranked.len());
        for (user_id, score) in ranked {
            let username = self
                .store()
                .hget(&keys::user(&user_id), keys::USER_USERNAME)
                .await?;

            entries.push(LifetimeEntry {
                username: display_name(username, &user_id),
                user_id,
                score: score_to_count(score),
            });
        }

        Ok(entries)
    }

    /// Top `limit` active streaks. Zero streaks are left out.
    pub async fn streak_leaderboard(&self, limit: usize) -> Result<Vec<StreakEntry>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let ranked = self
            .store()
            .zrange_desc(keys::STREAK_LEADERBOARD, Some(limit))
            .await?;

        let mut entries = Vec::with_capacity(ranked.len());
        for (user_id, score) in ranked {
            let streak = score_to_count(score);
            if streak == 0 {
                continue;
            }

            let username = self.store().hget(keys::USERNAMES, &user_id).await?;
            entries.push(StreakEntry {
                username: display_name(username, &user_id),
                user_id,
                streak,
            });
        }

        Ok(entries)
    }
}

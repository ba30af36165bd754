//! # User Aggregates
//!
//! Per-user hash `user:<id>` holding username, streak, last participation day
//! and win count. Lifetime score lives in the `leaderboard:lifetime` sorted set
//! so top-N reads stay cheap.
//!
//! ## Streaks
//!
//! Advanced once per submission event:
//!
//! - no prior participation: streak 1
//! - gap of 1 day: streak + 1
//! - same day: unchanged
//! - gap above 1 day, or a day earlier than the last one: reset to 1
//!
//! Each update also upserts `leaderboard:streak` and the `usernames` lookup.
//! Streak writes are per-field and not race-guarded; one update per submission
//! event is expected.
use std::collections::HashMap;

use tracing::debug;

use crate::{
    Contest,
    day::Day,
    error::{Error, Result},
    keys,
    models::UserStats,
    score_to_count,
};

/// Streak after participating on `day`, given the previous participation.
pub fn next_streak(previous: Option<(Day, u64)>, day: Day) -> u64 {
    match previous {
        None => 1,
        Some((last, streak)) => match day.days_since(last) {
            0 => streak,
            1 => streak + 1,
            _ => 1,
        },
    }
}

fn parse_count(key: &str, fields: &HashMap<String, String>, field: &str) -> Result<u64> {
    match fields.get(field).map(|value| value.trim()) {
        None | Some("") => Ok(0),
        Some(value) => value.parse().map_err(|_| Error::MalformedNumber {
            key: format!("{key}.{field}"),
            value: value.to_string(),
        }),
    }
}

fn parse_day(key: &str, fields: &HashMap<String, String>) -> Result<Option<Day>> {
    match fields.get(keys::USER_LAST_PARTICIPATION).map(|value| value.trim()) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| Error::MalformedDate {
            key: format!("{key}.{}", keys::USER_LAST_PARTICIPATION),
            value: value.to_string(),
        }),
    }
}

impl Contest {
    pub async fn user_stats(&self, user_id: &str) -> Result<UserStats> {
        let key = keys::user(user_id);
        let fields = self.store().hgetall(&key).await?;

        Ok(UserStats {
            username: fields.get(keys::USER_USERNAME).cloned().unwrap_or_default(),
            streak: parse_count(&key, &fields, keys::USER_STREAK)?,
            last_participation: parse_day(&key, &fields)?,
            wins: parse_count(&key, &fields, keys::USER_WINS)?,
            total_score: self.lifetime_score(user_id).await?,
        })
    }

    pub async fn set_username(&self, user_id: &str, username: &str) -> Result<()> {
        self.store()
            .hset(&keys::user(user_id), &[(keys::USER_USERNAME, username)])
            .await?;
        self.store()
            .hset(keys::USERNAMES, &[(user_id, username)])
            .await
    }

    pub async fn update_streak(&self, user_id: &str, day: Day) -> Result<u64> {
        let key = keys::user(user_id);
        let fields = self.store().hgetall(&key).await?;

        let previous = parse_day(&key, &fields)?
            .map(|last| Ok::<_, Error>((last, parse_count(&key, &fields, keys::USER_STREAK)?)))
            .transpose()?;

        let streak = next_streak(previous, day);
        let streak_value = streak.to_string();
        let day_value = day.to_string();

        self.store()
            .hset(
                &key,
                &[
                    (keys::USER_STREAK, streak_value.as_str()),
                    (keys::USER_LAST_PARTICIPATION, day_value.as_str()),
                ],
            )
            .await?;
        self.store()
            .zadd(keys::STREAK_LEADERBOARD, user_id, streak as f64)
            .await?;

        if let Some(username) = fields.get(keys::USER_USERNAME).filter(|name| !name.is_empty()) {
            self.store()
                .hset(keys::USERNAMES, &[(user_id, username.as_str())])
                .await?;
        }

        debug!(user = %user_id, %day, streak, "Updated streak");

        Ok(streak)
    }

    /// Returns the user's new win count.
    pub async fn record_win(&self, user_id: &str) -> Result<u64> {
        let wins = self
            .store()
            .hincr_by(&keys::user(user_id), keys::USER_WINS, 1)
            .await?;

        Ok(wins.max(0) as u64)
    }

    /// Returns the user's new lifetime score.
    pub async fn add_lifetime_score(&self, user_id: &str, points: u64) -> Result<u64> {
        let score = self
            .store()
            .zincr_by(keys::LIFETIME_LEADERBOARD, user_id, points as f64)
            .await?;

        Ok(score_to_count(score))
    }

    pub async fn lifetime_score(&self, user_id: &str) -> Result<u64> {
        Ok(self
            .store()
            .zscore(keys::LIFETIME_LEADERBOARD, user_id)
            .await?
            .map_or(0, score_to_count))
    }
}

//! Logical key layout. Every key the contest touches is built here.

use crate::day::Day;

pub const LIFETIME_LEADERBOARD: &str = "leaderboard:lifetime";
pub const STREAK_LEADERBOARD: &str = "leaderboard:streak";
pub const USERNAMES: &str = "usernames";

pub const USER_USERNAME: &str = "username";
pub const USER_STREAK: &str = "streak";
pub const USER_LAST_PARTICIPATION: &str = "lastParticipation";
pub const USER_WINS: &str = "wins";

/// Hash of submission id to JSON record.
pub fn submissions(day: Day) -> String {
    format!("submissions:{day}")
}

pub fn user_submitted(day: Day, user_id: &str) -> String {
    format!("user-submitted:{day}:{user_id}")
}

/// Sorted set of submission id to vote count.
pub fn daily_leaderboard(day: Day) -> String {
    format!("leaderboard:{day}")
}

/// Sorted set of voter id to vote timestamp.
pub fn voters(day: Day, submission_id: &str) -> String {
    format!("votes:{day}:{submission_id}")
}

pub fn vote_cooldown(voter_id: &str) -> String {
    format!("ratelimit:vote:{voter_id}")
}

pub fn user(user_id: &str) -> String {
    format!("user:{user_id}")
}

pub fn finalized(day: Day) -> String {
    format!("finalized:{day}")
}

pub fn daily_caption(day: Day) -> String {
    format!("day:{day}:caption")
}

pub fn daily_post_id(day: Day) -> String {
    format!("day:{day}:postId")
}

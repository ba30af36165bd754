use std::fmt;

use serde::{Deserialize, Serialize};

use crate::day::Day;

pub const MAX_OVERLAYS: usize = 5;
pub const MAX_OVERLAY_TEXT: usize = 80;
pub const OVERLAY_POSITION_RANGE: std::ops::RangeInclusive<f64> = 0.0..=100.0;

/// Text drawn over a meme. Decoration only, never ranked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOverlay {
    pub id: String,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
}

/// Stored as JSON in the per-day submissions hash. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub image_url: String,
    pub caption: String,
    /// Epoch milliseconds.
    pub submitted_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlays: Option<Vec<TextOverlay>>,
}

/// Already-validated submission intake.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub user_id: String,
    pub username: String,
    pub image_url: String,
    pub caption: String,
    pub overlays: Vec<TextOverlay>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Stored(Submission),
    AlreadySubmitted,
}

/// Result of a full submission event: ledger write plus streak update.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    Entered { submission: Submission, streak: u64 },
    AlreadySubmitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Carries the submission's tally after this vote.
    Accepted { votes: u64 },
    OwnSubmission,
    UnknownSubmission,
    RateLimited,
    AlreadyVoted,
}

impl VoteOutcome {
    pub fn is_accepted(self) -> bool {
        matches!(self, VoteOutcome::Accepted { .. })
    }
}

impl fmt::Display for VoteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteOutcome::Accepted { votes } => write!(f, "Vote recorded ({votes} total)"),
            VoteOutcome::OwnSubmission => write!(f, "Cannot vote on your own submission"),
            VoteOutcome::UnknownSubmission => write!(f, "Submission not found for this day"),
            VoteOutcome::RateLimited => write!(f, "Voting too fast, wait a moment and try again"),
            VoteOutcome::AlreadyVoted => write!(f, "User already voted on this submission"),
        }
    }
}

impl fmt::Display for SubmitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitOutcome::Stored(submission) => write!(f, "Stored submission {}", submission.id),
            SubmitOutcome::AlreadySubmitted => write!(f, "User already submitted today"),
        }
    }
}

impl fmt::Display for EntryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryOutcome::Entered { submission, streak } => {
                write!(f, "Entered submission {} (streak {streak})", submission.id)
            }
            EntryOutcome::AlreadySubmitted => write!(f, "User already submitted today"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub username: String,
    pub streak: u64,
    pub last_participation: Option<Day>,
    pub wins: u64,
    pub total_score: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyEntry {
    pub submission_id: String,
    pub user_id: String,
    pub username: String,
    pub votes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifetimeEntry {
    pub user_id: String,
    pub username: String,
    pub score: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakEntry {
    pub user_id: String,
    pub username: String,
    pub streak: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteStatus {
    pub has_voted: bool,
    pub is_own_submission: bool,
    pub vote_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPost {
    pub day: Day,
    pub caption: Option<String>,
    pub post_id: Option<String>,
}

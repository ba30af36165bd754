//! # Contest
//!
//! Finalization and ranking core of the daily caption meme contest.
//!
//! Once a day a caption is published, users submit one meme each, everyone
//! else votes, and when the day closes the votes become placement points,
//! wins and streaks.
//!
//!
//!
//! # Components
//!
//! - **Submission ledger** ([`submissions`]): one submission per user per day.
//! - **Vote ledger** ([`votes`]): one vote per voter per submission per day, never on your own entry.
//!   Feeds the live daily leaderboard.
//! - **User aggregates** ([`users`]): username, streak, last participation, wins, lifetime score.
//! - **Finalization** ([`finalize`] + [`ranking`]): converts one day's tallies into lifetime
//!   score and wins, exactly once per day.
//! - **Leaderboards** ([`leaderboard`]): read paths for daily, lifetime and streak rankings.
//!
//!
//!
//! # Concurrency
//!
//! There is no in-process shared state. Every request is an independent unit
//! of work and all coordination goes through the atomic primitives of
//! [`store::Store`]:
//!
//! - Finalization is gated by a set-if-absent marker `finalized:<day>`. The
//!   first caller to create it awards the day, every other caller no-ops.
//! - A vote counts only if the voter wins the add-if-absent on the
//!   submission's voter set. Only that call increments the tally.
//! - Tallies, lifetime scores and wins are server-side increments.
//!
//!
//!
//! # Keys
//!
//! | Key | Type | Contents |
//! |-----|------|----------|
//! | `submissions:<day>` | hash | submission id → JSON record |
//! | `user-submitted:<day>:<user>` | string | submitted flag |
//! | `leaderboard:<day>` | sorted set | submission id → votes |
//! | `votes:<day>:<submission>` | sorted set | voter id → vote time (ms) |
//! | `ratelimit:vote:<voter>` | string, expiring | vote cooldown |
//! | `user:<user>` | hash | username, streak, lastParticipation, wins |
//! | `leaderboard:lifetime` | sorted set | user id → lifetime score |
//! | `leaderboard:streak` | sorted set | user id → streak |
//! | `usernames` | hash | user id → username |
//! | `finalized:<day>` | string | finalization marker, never cleared |
//! | `day:<day>:caption`, `day:<day>:postId` | string | daily post |
use std::{sync::Arc, time::Duration};

pub mod daily_post;
pub mod day;
pub mod error;
pub mod finalize;
pub mod keys;
pub mod leaderboard;
pub mod models;
pub mod ranking;
pub mod store;
pub mod submissions;
pub mod users;
pub mod votes;

pub use day::Day;
pub use error::{Error, Result};
pub use finalize::Finalization;
pub use models::{
    DailyEntry, DailyPost, EntryOutcome, LifetimeEntry, NewSubmission, StreakEntry, Submission,
    SubmitOutcome, TextOverlay, UserStats, VoteOutcome, VoteStatus,
};
pub use ranking::Placement;
pub use store::{MemoryStore, RedisStore, Store};

pub const DEFAULT_VOTE_COOLDOWN: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct Settings {
    /// Minimum spacing between one voter's vote requests. Zero disables the cooldown.
    pub vote_cooldown: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vote_cooldown: DEFAULT_VOTE_COOLDOWN,
        }
    }
}

/// Handle to the contest core. Cheap to clone, holds no state besides the store.
#[derive(Clone)]
pub struct Contest {
    store: Arc<dyn Store>,
    settings: Settings,
}

impl Contest {
    pub fn new(store: Arc<dyn Store>, settings: Settings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}

/// Sorted-set scores are whole numbers stored as floats.
pub(crate) fn score_to_count(score: f64) -> u64 {
    if score.is_finite() && score > 0.0 {
        score.round() as u64
    } else {
        0
    }
}

pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

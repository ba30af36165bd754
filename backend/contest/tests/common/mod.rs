#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use contest::{Contest, Day, MemoryStore, NewSubmission, Settings, Submission, SubmitOutcome};

pub const DAY: &str = "2026-02-05";

pub fn day() -> Day {
    DAY.parse().unwrap()
}

pub fn day_of(s: &str) -> Day {
    s.parse().unwrap()
}

/// Contest without a vote cooldown, so one voter can vote on many entries back to back.
pub fn setup() -> Contest {
    Contest::new(
        Arc::new(MemoryStore::new()),
        Settings {
            vote_cooldown: Duration::ZERO,
        },
    )
}

pub fn setup_with_cooldown() -> Contest {
    Contest::new(Arc::new(MemoryStore::new()), Settings::default())
}

pub fn entry(user: &str) -> NewSubmission {
    NewSubmission {
        user_id: user.to_string(),
        username: format!("{user}-name"),
        image_url: format!("https://img/{user}.jpg"),
        caption: "When the build is green on the first try".to_string(),
        overlays: Vec::new(),
    }
}

pub async fn submit(contest: &Contest, user: &str, day: Day) -> Submission {
    match contest.store_submission(day, entry(user)).await.unwrap() {
        SubmitOutcome::Stored(submission) => submission,
        other => panic!("expected stored submission, got {other:?}"),
    }
}

/// Casts `count` votes from fresh voters.
pub async fn votes(contest: &Contest, submission: &Submission, day: Day, count: usize) {
    for n in 0..count {
        let voter = format!("voter-{}-{n}", submission.id);
        assert!(contest
            .cast_vote(&voter, &submission.id, day)
            .await
            .unwrap()
            .is_accepted());
    }
}

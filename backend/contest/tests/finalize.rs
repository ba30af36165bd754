mod common;

use common::{day, day_of, setup, submit, votes};
use contest::{Finalization, UserStats};

async fn score_and_wins(contest: &contest::Contest, user: &str) -> (u64, u64) {
    let UserStats {
        total_score, wins, ..
    } = contest.user_stats(user).await.unwrap();
    (total_score, wins)
}

#[tokio::test]
async fn test_empty_day_is_noop() {
    let contest = setup();

    assert_eq!(contest.finalize(day()).await.unwrap(), Finalization::Empty);
    assert!(contest.is_finalized(day()).await.unwrap());
    assert!(contest.lifetime_leaderboard(10).await.unwrap().is_empty());

    // Late submissions on an already-finalized empty day are never awarded.
    submit(&contest, "user1", day()).await;
    assert_eq!(
        contest.finalize(day()).await.unwrap(),
        Finalization::AlreadyFinalized
    );
    assert_eq!(score_and_wins(&contest, "user1").await, (0, 0));
}

#[tokio::test]
async fn test_single_submission_without_votes_wins() {
    let contest = setup();
    submit(&contest, "user1", day()).await;

    contest.finalize(day()).await.unwrap();

    assert_eq!(score_and_wins(&contest, "user1").await, (51, 1));
}

#[tokio::test]
async fn test_distinct_placements() {
    let contest = setup();

    let mut subs = Vec::new();
    for n in 1..=5 {
        subs.push(submit(&contest, &format!("user{n}"), day()).await);
    }
    for (sub, count) in subs.iter().zip([4, 3, 2, 1, 0]) {
        votes(&contest, sub, day(), count).await;
    }

    let Finalization::Awarded(placements) = contest.finalize(day()).await.unwrap() else {
        panic!("expected awards");
    };
    assert_eq!(placements.len(), 5);

    let expected = [(51, 1), (31, 0), (16, 0), (6, 0), (4, 0)];
    for (n, want) in (1..=5).zip(expected) {
        assert_eq!(score_and_wins(&contest, &format!("user{n}")).await, want);
    }
}

#[tokio::test]
async fn test_tied_first_place_both_win() {
    let contest = setup();

    let a = submit(&contest, "user1", day()).await;
    let b = submit(&contest, "user2", day()).await;
    let c = submit(&contest, "user3", day()).await;
    votes(&contest, &a, day(), 2).await;
    votes(&contest, &b, day(), 2).await;
    votes(&contest, &c, day(), 1).await;

    contest.finalize(day()).await.unwrap();

    assert_eq!(score_and_wins(&contest, "user1").await, (51, 1));
    assert_eq!(score_and_wins(&contest, "user2").await, (51, 1));
    assert_eq!(score_and_wins(&contest, "user3").await, (16, 0));
}

#[tokio::test]
async fn test_all_zero_votes_all_win() {
    let contest = setup();
    for n in 1..=3 {
        submit(&contest, &format!("user{n}"), day()).await;
    }

    contest.finalize(day()).await.unwrap();

    for n in 1..=3 {
        assert_eq!(score_and_wins(&contest, &format!("user{n}")).await, (51, 1));
    }
}

#[tokio::test]
async fn test_long_tail_points() {
    let contest = setup();

    for n in 1..=12 {
        let sub = submit(&contest, &format!("user{n}"), day()).await;
        votes(&contest, &sub, day(), 12 - n).await;
    }

    contest.finalize(day()).await.unwrap();

    let expected = [51, 31, 16, 6, 4, 2, 2, 2, 2, 2, 1, 1];
    for (n, want) in (1..=12).zip(expected) {
        let (score, wins) = score_and_wins(&contest, &format!("user{n}")).await;
        assert_eq!(score, want, "user{n}");
        assert_eq!(wins, u64::from(n == 1), "user{n}");
    }
}

#[tokio::test]
async fn test_repeated_finalize_awards_once() {
    let contest = setup();
    let a = submit(&contest, "user1", day()).await;
    submit(&contest, "user2", day()).await;
    votes(&contest, &a, day(), 3).await;

    assert!(matches!(
        contest.finalize(day()).await.unwrap(),
        Finalization::Awarded(_)
    ));
    for _ in 0..5 {
        assert_eq!(
            contest.finalize(day()).await.unwrap(),
            Finalization::AlreadyFinalized
        );
    }

    assert_eq!(score_and_wins(&contest, "user1").await, (51, 1));
    assert_eq!(score_and_wins(&contest, "user2").await, (31, 0));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_finalize_has_one_winner() {
    let contest = setup();
    let a = submit(&contest, "user1", day()).await;
    submit(&contest, "user2", day()).await;
    votes(&contest, &a, day(), 1).await;

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let contest = contest.clone();
            tokio::spawn(async move { contest.finalize(day()).await.unwrap() })
        })
        .collect();

    let mut awarded = 0;
    for handle in handles {
        if let Finalization::Awarded(_) = handle.await.unwrap() {
            awarded += 1;
        }
    }

    assert_eq!(awarded, 1);
    assert_eq!(score_and_wins(&contest, "user1").await, (51, 1));
    assert_eq!(score_and_wins(&contest, "user2").await, (31, 0));
}

#[tokio::test]
async fn test_late_votes_do_not_change_awards() {
    let contest = setup();
    let a = submit(&contest, "user1", day()).await;
    let b = submit(&contest, "user2", day()).await;
    votes(&contest, &a, day(), 1).await;

    contest.finalize(day()).await.unwrap();

    votes(&contest, &b, day(), 3).await;
    contest.finalize(day()).await.unwrap();

    assert_eq!(score_and_wins(&contest, "user1").await, (51, 1));
    assert_eq!(score_and_wins(&contest, "user2").await, (31, 0));
    assert_eq!(contest.vote_count(&b.id, day()).await.unwrap(), 3);
}

#[tokio::test]
async fn test_scores_accumulate_across_days() {
    let contest = setup();
    let first = day_of("2026-02-05");
    let second = day_of("2026-02-06");

    submit(&contest, "user1", first).await;
    let a = submit(&contest, "user1", second).await;
    submit(&contest, "user2", second).await;
    votes(&contest, &a, second, 1).await;

    contest.finalize(first).await.unwrap();
    contest.finalize(second).await.unwrap();

    assert_eq!(score_and_wins(&contest, "user1").await, (102, 2));
    assert_eq!(score_and_wins(&contest, "user2").await, (31, 0));
}

mod common;

use common::{day, day_of, setup, submit, votes};

#[tokio::test]
async fn test_daily_leaderboard_backfills_zero_vote_entries() {
    let contest = setup();
    let a = submit(&contest, "user1", day()).await;
    let b = submit(&contest, "user2", day()).await;
    let c = submit(&contest, "user3", day()).await;
    votes(&contest, &b, day(), 2).await;

    let board = contest.daily_leaderboard(day(), 10).await.unwrap();

    assert_eq!(board.len(), 3);
    assert_eq!(board[0].submission_id, b.id);
    assert_eq!(board[0].votes, 2);
    assert_eq!(board[0].username, "user2-name");

    let mut rest: Vec<&str> = board[1..].iter().map(|e| e.submission_id.as_str()).collect();
    rest.sort_unstable();
    let mut want = vec![a.id.as_str(), c.id.as_str()];
    want.sort_unstable();
    assert_eq!(rest, want);
    assert!(board[1..].iter().all(|e| e.votes == 0));
}

#[tokio::test]
async fn test_daily_leaderboard_respects_limit() {
    let contest = setup();
    for n in 1..=4 {
        let sub = submit(&contest, &format!("user{n}"), day()).await;
        votes(&contest, &sub, day(), n).await;
    }

    let board = contest.daily_leaderboard(day(), 2).await.unwrap();
    let counts: Vec<u64> = board.iter().map(|e| e.votes).collect();
    assert_eq!(counts, [4, 3]);

    assert!(contest.daily_leaderboard(day(), 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_leaderboards_accept_huge_limits() {
    let contest = setup();
    let a = submit(&contest, "user1", day()).await;
    submit(&contest, "user2", day()).await;
    votes(&contest, &a, day(), 1).await;
    contest.update_streak("user1", day()).await.unwrap();
    contest.update_streak("user2", day()).await.unwrap();
    contest.finalize(day()).await.unwrap();

    for limit in [usize::MAX, 1_000_000_000_000] {
        let board = contest.daily_leaderboard(day(), limit).await.unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].submission_id, a.id);

        assert_eq!(contest.lifetime_leaderboard(limit).await.unwrap().len(), 2);
        assert_eq!(contest.streak_leaderboard(limit).await.unwrap().len(), 2);
    }
}

#[tokio::test]
async fn test_daily_leaderboard_is_per_day() {
    let contest = setup();
    submit(&contest, "user1", day()).await;

    assert!(contest
        .daily_leaderboard(day_of("2026-02-06"), 10)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_lifetime_leaderboard_falls_back_to_user_id() {
    let contest = setup();
    contest.set_username("user1", "Alice").await.unwrap();
    contest.add_lifetime_score("user1", 51).await.unwrap();
    contest.add_lifetime_score("ghost", 80).await.unwrap();
    contest.add_lifetime_score("user2", 16).await.unwrap();

    let board = contest.lifetime_leaderboard(2).await.unwrap();

    assert_eq!(board.len(), 2);
    assert_eq!(
        (board[0].user_id.as_str(), board[0].username.as_str(), board[0].score),
        ("ghost", "ghost", 80)
    );
    assert_eq!(
        (board[1].user_id.as_str(), board[1].username.as_str(), board[1].score),
        ("user1", "Alice", 51)
    );
}

#[tokio::test]
async fn test_streak_leaderboard() {
    let contest = setup();
    contest.set_username("user1", "Alice").await.unwrap();

    for d in ["2026-02-03", "2026-02-04", "2026-02-05"] {
        contest.update_streak("user1", day_of(d)).await.unwrap();
    }
    contest.update_streak("user2", day()).await.unwrap();

    let board = contest.streak_leaderboard(10).await.unwrap();

    assert_eq!(board.len(), 2);
    assert_eq!(board[0].username, "Alice");
    assert_eq!(board[0].streak, 3);
    assert_eq!(board[1].username, "user2");
    assert_eq!(board[1].streak, 1);
}

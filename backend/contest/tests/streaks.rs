mod common;

use common::{day_of, setup};

#[tokio::test]
async fn test_streak_transitions() {
    let contest = setup();

    let steps = [
        ("2026-02-01", 1),
        ("2026-02-02", 2),
        ("2026-02-02", 2),
        ("2026-02-03", 3),
        ("2026-02-06", 1),
        ("2026-02-07", 2),
        ("2026-02-01", 1),
    ];

    for (d, want) in steps {
        assert_eq!(contest.update_streak("user1", day_of(d)).await.unwrap(), want, "{d}");
    }

    let stats = contest.user_stats("user1").await.unwrap();
    assert_eq!(stats.streak, 1);
    assert_eq!(stats.last_participation, Some(day_of("2026-02-01")));
}

#[tokio::test]
async fn test_unknown_user_has_empty_stats() {
    let contest = setup();

    let stats = contest.user_stats("nobody").await.unwrap();

    assert_eq!(stats, contest::UserStats::default());
}

#[tokio::test]
async fn test_record_win_counts() {
    let contest = setup();

    assert_eq!(contest.record_win("user1").await.unwrap(), 1);
    assert_eq!(contest.record_win("user1").await.unwrap(), 2);
    assert_eq!(contest.user_stats("user1").await.unwrap().wins, 2);
}

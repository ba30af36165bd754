use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use contest::{
    DailyEntry, DailyPost, EntryOutcome, Finalization, LifetimeEntry, StreakEntry, Submission,
    TextOverlay, UserStats, VoteOutcome, VoteStatus,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    state::AppState,
    utils::{day_or_today, leaderboard_limit, parse_day, sanitize, today, validate_submission},
};

type Reply<T> = Result<Json<T>, AppError>;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPayload {
    pub user_id: String,
    pub username: String,
    pub image_url: String,
    /// Defaults to today's caption.
    pub caption: Option<String>,
    pub overlays: Option<Vec<TextOverlay>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub submission: Submission,
    pub streak: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotePayload {
    pub voter_id: String,
    pub submission_id: String,
    /// Admin votes may target another day.
    pub day: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub voted: bool,
    pub vote_count: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_id: String,
}

#[derive(Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
    pub day: Option<String>,
}

#[derive(Deserialize)]
pub struct DayPayload {
    pub day: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinPayload {
    pub user_id: String,
}

#[derive(Serialize)]
pub struct WinResponse {
    pub wins: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPostPayload {
    pub day: Option<String>,
    pub caption: String,
    pub post_id: String,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

fn vote_reply(outcome: VoteOutcome) -> Reply<VoteResponse> {
    match outcome {
        VoteOutcome::Accepted { votes } => Ok(Json(VoteResponse {
            voted: true,
            vote_count: votes,
        })),
        rejected => Err(AppError::Rejected(rejected.to_string())),
    }
}

fn vote_target(payload: &VotePayload) -> Result<(String, String), AppError> {
    let voter = sanitize(&payload.voter_id);
    let submission = sanitize(&payload.submission_id);

    if voter.is_empty() || submission.is_empty() {
        return Err(AppError::MalformedPayload(
            "voterId and submissionId are required".to_string(),
        ));
    }

    Ok((voter, submission))
}

pub async fn caption_handler(State(state): State<Arc<AppState>>) -> Reply<DailyPost> {
    Ok(Json(state.contest.daily_post(today()).await?))
}

pub async fn submit_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SubmitPayload>,
) -> Reply<SubmitResponse> {
    let day = today();

    let caption = match payload.caption.clone() {
        Some(caption) => caption,
        None => state.contest.today_caption(day).await?.ok_or_else(|| {
            AppError::MalformedPayload("No caption posted today".to_string())
        })?,
    };

    let new = validate_submission(payload, caption)?;

    match state.contest.submit(day, new).await? {
        EntryOutcome::Entered { submission, streak } => {
            Ok(Json(SubmitResponse { submission, streak }))
        }
        rejected => Err(AppError::Rejected(rejected.to_string())),
    }
}

pub async fn submissions_handler(State(state): State<Arc<AppState>>) -> Reply<Vec<Submission>> {
    Ok(Json(state.contest.submissions_for_voting(today()).await?))
}

pub async fn submission_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Reply<Submission> {
    state
        .contest
        .submission(&id, today())
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

pub async fn vote_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<VotePayload>,
) -> Reply<VoteResponse> {
    let (voter, submission) = vote_target(&payload)?;

    vote_reply(state.contest.cast_vote(&voter, &submission, today()).await?)
}

pub async fn vote_status_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Reply<VoteStatus> {
    Ok(Json(
        state
            .contest
            .vote_status(&query.user_id, &id, today())
            .await?,
    ))
}

pub async fn user_stats_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Reply<UserStats> {
    Ok(Json(state.contest.user_stats(&user_id).await?))
}

pub async fn daily_leaderboard_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LeaderboardQuery>,
) -> Reply<Vec<DailyEntry>> {
    let day = day_or_today(query.day.as_deref())?;
    let limit = leaderboard_limit(query.limit, state.config.leaderboard_limit);

    Ok(Json(state.contest.daily_leaderboard(day, limit).await?))
}

pub async fn lifetime_leaderboard_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LeaderboardQuery>,
) -> Reply<Vec<LifetimeEntry>> {
    let limit = leaderboard_limit(query.limit, state.config.leaderboard_limit);

    Ok(Json(state.contest.lifetime_leaderboard(limit).await?))
}

pub async fn streak_leaderboard_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LeaderboardQuery>,
) -> Reply<Vec<StreakEntry>> {
    let limit = leaderboard_limit(query.limit, state.config.leaderboard_limit);

    Ok(Json(state.contest.streak_leaderboard(limit).await?))
}

pub async fn finalize_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DayPayload>,
) -> Reply<Finalization> {
    let day = match payload.day.as_deref() {
        Some(raw) => parse_day(raw)?,
        None => today()
            .previous()
            .ok_or_else(|| AppError::MalformedPayload("No previous day".to_string()))?,
    };

    Ok(Json(state.contest.finalize(day).await?))
}

pub async fn simulate_vote_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<VotePayload>,
) -> Reply<VoteResponse> {
    let (voter, submission) = vote_target(&payload)?;
    let day = day_or_today(payload.day.as_deref())?;

    vote_reply(state.contest.simulate_vote(&voter, &submission, day).await?)
}

pub async fn record_win_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<WinPayload>,
) -> Reply<WinResponse> {
    let user_id = sanitize(&payload.user_id);
    if user_id.is_empty() {
        return Err(AppError::MalformedPayload("userId is required".to_string()));
    }

    Ok(Json(WinResponse {
        wins: state.contest.record_win(&user_id).await?,
    }))
}

pub async fn daily_post_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DailyPostPayload>,
) -> Reply<DailyPost> {
    let day = day_or_today(payload.day.as_deref())?;

    state
        .contest
        .record_daily_post(day, &sanitize(&payload.caption), payload.post_id.trim())
        .await?;

    Ok(Json(state.contest.daily_post(day).await?))
}

pub async fn delete_submission_handler(
    State(state): State<Arc<AppState>>,
    Path((day, id)): Path<(String, String)>,
) -> Reply<DeleteResponse> {
    let day = parse_day(&day)?;

    if !state.contest.delete_submission(&id, day).await? {
        return Err(AppError::NotFound);
    }

    Ok(Json(DeleteResponse { deleted: true }))
}

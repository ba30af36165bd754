use std::sync::{Arc, LazyLock};

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use contest::{
    Day, NewSubmission, TextOverlay,
    models::{MAX_OVERLAY_TEXT, MAX_OVERLAYS, OVERLAY_POSITION_RANGE},
};
use regex::Regex;
use tracing::warn;

use crate::{
    error::AppError::{self, MalformedPayload},
    routes::SubmitPayload,
    state::AppState,
};

pub const ADMIN_HEADER: &str = "x-admin-token";

pub const MAX_LEADERBOARD_LIMIT: usize = 100;

const ALLOWED_IMAGE_SCHEMES: [&str; 2] = ["https://", "data:"];

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

pub fn today() -> Day {
    Day::today()
}

pub fn parse_day(raw: &str) -> Result<Day, AppError> {
    raw.parse()
        .map_err(|_| MalformedPayload(format!("Invalid day {raw:?}, expected YYYY-MM-DD")))
}

pub fn day_or_today(raw: Option<&str>) -> Result<Day, AppError> {
    raw.map_or_else(|| Ok(today()), parse_day)
}

/// Requested leaderboard size, or the configured default, capped at [`MAX_LEADERBOARD_LIMIT`].
pub fn leaderboard_limit(requested: Option<usize>, default: usize) -> usize {
    requested.unwrap_or(default).min(MAX_LEADERBOARD_LIMIT)
}

/// Trims and collapses runs of whitespace to single spaces.
pub fn sanitize(input: &str) -> String {
    WHITESPACE.replace_all(input.trim(), " ").into_owned()
}

fn required(field: &str, value: &str) -> Result<String, AppError> {
    let value = sanitize(value);

    if value.is_empty() {
        return Err(MalformedPayload(format!("{field} is required")));
    }

    Ok(value)
}

pub fn is_valid_image_url(url: &str) -> bool {
    ALLOWED_IMAGE_SCHEMES
        .iter()
        .any(|scheme| url.starts_with(scheme))
}

fn validate_overlay(overlay: TextOverlay) -> Result<TextOverlay, AppError> {
    let text = sanitize(&overlay.text);
    let length = text.chars().count();

    if length == 0 || length > MAX_OVERLAY_TEXT {
        return Err(MalformedPayload(format!(
            "Overlay text must be 1 to {MAX_OVERLAY_TEXT} characters"
        )));
    }

    if !OVERLAY_POSITION_RANGE.contains(&overlay.x) || !OVERLAY_POSITION_RANGE.contains(&overlay.y) {
        return Err(MalformedPayload(
            "Overlay position must be within 0 to 100".to_string(),
        ));
    }

    if !overlay.font_size.is_finite() || overlay.font_size <= 0.0 {
        return Err(MalformedPayload("Overlay font size must be positive".to_string()));
    }

    Ok(TextOverlay {
        id: required("overlay id", &overlay.id)?,
        text,
        ..overlay
    })
}

/// Boundary validation. The contest core only ever sees checked input.
pub fn validate_submission(payload: SubmitPayload, caption: String) -> Result<NewSubmission, AppError> {
    let image_url = payload.image_url.trim().to_string();
    if !is_valid_image_url(&image_url) {
        return Err(MalformedPayload(
            "Image URL must use https: or data:".to_string(),
        ));
    }

    let overlays = payload.overlays.unwrap_or_default();
    if overlays.len() > MAX_OVERLAYS {
        return Err(MalformedPayload(format!(
            "At most {MAX_OVERLAYS} overlays are allowed"
        )));
    }

    Ok(NewSubmission {
        user_id: required("userId", &payload.user_id)?,
        username: required("username", &payload.username)?,
        image_url,
        caption: required("caption", &caption)?,
        overlays: overlays
            .into_iter()
            .map(validate_overlay)
            .collect::<Result<_, _>>()?,
    })
}

pub fn check_admin(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    let Some(expected) = state.config.admin_token.as_deref() else {
        return Err(AppError::Unauthorized);
    };

    match headers.get(ADMIN_HEADER).and_then(|value| value.to_str().ok()) {
        Some(token) if token == expected => Ok(()),
        _ => Err(AppError::Unauthorized),
    }
}

pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    check_admin(&state, &headers)?;

    Ok(next.run(request).await)
}

/// There is no background scheduler, so any request after rollover finalizes
/// the previous day. Finalization is idempotent and cheap once the marker exists.
pub async fn finalize_previous_day(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(yesterday) = today().previous() {
        if let Err(e) = state.contest.finalize(yesterday).await {
            warn!(day = %yesterday, "Lazy finalization failed: {e}");
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> SubmitPayload {
        SubmitPayload {
            user_id: "t2_abc".to_string(),
            username: "  meme   lord ".to_string(),
            image_url: "https://img/1.jpg".to_string(),
            caption: None,
            overlays: None,
        }
    }

    fn overlay(text: &str, x: f64, y: f64) -> TextOverlay {
        TextOverlay {
            id: "o1".to_string(),
            text: text.to_string(),
            x,
            y,
            font_size: 24.0,
        }
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("  hello   world "), "hello world");
        assert_eq!(sanitize("line\nbreak\ttab"), "line break tab");
        assert_eq!(sanitize("   "), "");
    }

    #[test]
    fn test_image_url_schemes() {
        assert!(is_valid_image_url("https://i.redd.it/x.png"));
        assert!(is_valid_image_url("data:image/png;base64,AAAA"));
        assert!(!is_valid_image_url("http://i.redd.it/x.png"));
        assert!(!is_valid_image_url("javascript:alert(1)"));
        assert!(!is_valid_image_url(""));
    }

    #[test]
    fn test_valid_submission_is_normalized() {
        let new = validate_submission(payload(), " caption ".to_string()).unwrap();

        assert_eq!(new.username, "meme lord");
        assert_eq!(new.caption, "caption");
        assert!(new.overlays.is_empty());
    }

    #[test]
    fn test_rejects_bad_submission_fields() {
        let mut bad_url = payload();
        bad_url.image_url = "ftp://img".to_string();
        assert!(validate_submission(bad_url, "c".to_string()).is_err());

        let mut no_user = payload();
        no_user.user_id = " ".to_string();
        assert!(validate_submission(no_user, "c".to_string()).is_err());

        assert!(validate_submission(payload(), "".to_string()).is_err());
    }

    #[test]
    fn test_overlay_limits() {
        let mut too_many = payload();
        too_many.overlays = Some(vec![overlay("hi", 1.0, 1.0); MAX_OVERLAYS + 1]);
        assert!(validate_submission(too_many, "c".to_string()).is_err());

        let mut too_long = payload();
        too_long.overlays = Some(vec![overlay(&"a".repeat(MAX_OVERLAY_TEXT + 1), 1.0, 1.0)]);
        assert!(validate_submission(too_long, "c".to_string()).is_err());

        let mut off_canvas = payload();
        off_canvas.overlays = Some(vec![overlay("hi", 100.5, 0.0)]);
        assert!(validate_submission(off_canvas, "c".to_string()).is_err());

        let mut edge = payload();
        edge.overlays = Some(vec![overlay(&"a".repeat(MAX_OVERLAY_TEXT), 0.0, 100.0)]);
        assert_eq!(
            validate_submission(edge, "c".to_string()).unwrap().overlays.len(),
            1
        );
    }

    #[test]
    fn test_parse_day() {
        assert_eq!(parse_day("2026-02-05").unwrap().to_string(), "2026-02-05");
        assert!(parse_day("yesterday").is_err());
        assert_eq!(day_or_today(None).unwrap(), today());
    }

    #[test]
    fn test_leaderboard_limit_is_capped() {
        assert_eq!(leaderboard_limit(None, 10), 10);
        assert_eq!(leaderboard_limit(Some(3), 10), 3);
        assert_eq!(leaderboard_limit(Some(usize::MAX), 10), MAX_LEADERBOARD_LIMIT);
        assert_eq!(leaderboard_limit(None, 5_000), MAX_LEADERBOARD_LIMIT);
    }
}

//! HTTP layer of the daily caption meme contest.
//!
//! Thin glue over the `contest` crate: typed JSON payloads in, boundary
//! validation, then one core call per route. All contest rules live in the
//! core; rejections come back as 400s with a reason the client can show.
//!
//!
//!
//! # Routes
//!
//! | Method | Path | |
//! |--------|------|-|
//! | GET | `/api/caption` | today's caption and post id |
//! | POST | `/api/submit` | enter today's contest |
//! | GET | `/api/submissions` | today's entries, oldest first |
//! | GET | `/api/submissions/{id}` | one entry |
//! | POST | `/api/vote` | vote on an entry |
//! | GET | `/api/vote-status/{id}?userId=` | has voted, own entry, count |
//! | GET | `/api/users/{id}/stats` | streak, wins, lifetime score |
//! | GET | `/api/leaderboard/daily?limit=&day=` | `limit` capped at 100 |
//! | GET | `/api/leaderboard/lifetime?limit=` | `limit` capped at 100 |
//! | GET | `/api/leaderboard/streak?limit=` | `limit` capped at 100 |
//!
//! Admin routes sit under `/api/admin` and need the `x-admin-token` header to
//! match the `ADMIN_TOKEN` secret:
//!
//! | Method | Path | |
//! |--------|------|-|
//! | POST | `/api/admin/finalize` | finalize a day, default yesterday |
//! | POST | `/api/admin/vote` | vote without the cooldown |
//! | POST | `/api/admin/win` | add a win |
//! | POST | `/api/admin/daily-post` | record the day's caption post |
//! | DELETE | `/api/admin/submissions/{day}/{id}` | moderation removal |
//!
//!
//!
//! # Day Rollover
//!
//! There is no background timer. Every API request first finalizes
//! yesterday, which is a single `GET` once the day's marker exists. The
//! `process` binary can finalize a range of days from cron as well.
//!
//!
//!
//! # Configuration
//!
//! | Variable | Default |
//! |----------|---------|
//! | `RUST_PORT` | `1111` |
//! | `REDIS_URL` | `redis://127.0.0.1:6379` |
//! | `VOTE_COOLDOWN_MS` | `2000` |
//! | `LEADERBOARD_LIMIT` | `10` |
//! | `/run/secrets/ADMIN_TOKEN` | unset, admin routes disabled |
//!
//! Logging follows `RUST_LOG`.
//! ```sh
//! RUST_LOG=info,contest=debug cargo run -p server
//! ```
//!
//!
//!
//! # Setup
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderName, Method, header::CONTENT_TYPE},
    middleware::from_fn_with_state,
    routing::{delete, get, post},
};
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod utils;

use routes::*;
use state::AppState;
use utils::{ADMIN_HEADER, finalize_previous_day, require_admin};

pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(ADMIN_HEADER)])
        .max_age(Duration::from_secs(60 * 60));

    let admin = Router::new()
        .route("/finalize", post(finalize_handler))
        .route("/vote", post(simulate_vote_handler))
        .route("/win", post(record_win_handler))
        .route("/daily-post", post(daily_post_handler))
        .route("/submissions/{day}/{id}", delete(delete_submission_handler))
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    let api = Router::new()
        .route("/caption", get(caption_handler))
        .route("/submit", post(submit_handler))
        .route("/submissions", get(submissions_handler))
        .route("/submissions/{id}", get(submission_handler))
        .route("/vote", post(vote_handler))
        .route("/vote-status/{id}", get(vote_status_handler))
        .route("/users/{id}/stats", get(user_stats_handler))
        .route("/leaderboard/daily", get(daily_leaderboard_handler))
        .route("/leaderboard/lifetime", get(lifetime_leaderboard_handler))
        .route("/leaderboard/streak", get(streak_leaderboard_handler))
        .nest("/admin", admin)
        .layer(from_fn_with_state(state.clone(), finalize_previous_day));

    Router::new()
        .nest("/api", api)
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

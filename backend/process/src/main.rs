use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use contest::{Contest, Day, RedisStore, Settings};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Number of closed days before today to finalize.
    #[arg(default_value_t = 1)]
    days_before: u32,

    /// Finalize only this day (YYYY-MM-DD) instead of a range.
    #[arg(long)]
    day: Option<Day>,

    #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    redis_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();

    let store = RedisStore::connect(&args.redis_url)
        .await
        .with_context(|| format!("Failed to connect to Redis at {}", args.redis_url))?;
    let contest = Contest::new(Arc::new(store), Settings::default());

    let days = match args.day {
        Some(day) => vec![day],
        None => process::closed_days(Day::today(), args.days_before),
    };

    let summary = process::finalize_days(&contest, &days).await?;

    println!("Days Awarded: {}", summary.awarded);
    println!("Days Empty: {}", summary.empty);
    println!("Days Already Finalized: {}", summary.already);
    println!("Participants Awarded: {}", summary.participants);

    Ok(())
}

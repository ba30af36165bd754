//! # Finalization Runner
//!
//! Operator and cron hook for closing contest days.
//!
//! The server already finalizes yesterday lazily on the first request after
//! rollover. This runner covers quiet days and backfills: it walks the last
//! `days_before` days, oldest first, and finalizes each one. Every day is
//! gated by its `finalized:<day>` marker, so reruns and overlap with the
//! server are harmless. Today is never finalized here since voting is still open.
use anyhow::Result;
use contest::{Contest, Day, Finalization};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub awarded: usize,
    pub empty: usize,
    pub already: usize,
    pub participants: usize,
}

impl Summary {
    fn record(&mut self, outcome: &Finalization) {
        match outcome {
            Finalization::Awarded(placements) => {
                self.awarded += 1;
                self.participants += placements.len();
            }
            Finalization::Empty => self.empty += 1,
            Finalization::AlreadyFinalized => self.already += 1,
        }
    }
}

/// The `days_before` days preceding `today`, oldest first.
pub fn closed_days(today: Day, days_before: u32) -> Vec<Day> {
    (1..=i64::from(days_before))
        .rev()
        .filter_map(|offset| today.offset(-offset))
        .collect()
}

pub async fn finalize_days(contest: &Contest, days: &[Day]) -> Result<Summary> {
    let pb = ProgressBar::new(days.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("=> "),
    );

    let mut summary = Summary::default();

    for day in days {
        pb.set_message(format!("Finalizing {day}"));

        let outcome = contest.finalize(*day).await?;

        #[cfg(feature = "verbose")]
        println!("{day}: {outcome:?}");

        summary.record(&outcome);
        pb.inc(1);
    }

    pb.finish_with_message("Done");

    info!(
        awarded = summary.awarded,
        empty = summary.empty,
        already = summary.already,
        participants = summary.participants,
        "Finalization run complete"
    );

    Ok(summary)
}

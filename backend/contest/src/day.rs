use std::{fmt, str::FromStr};

use chrono::{Days, NaiveDate, ParseError, Utc};
use serde::{Deserialize, Serialize};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// One contest cycle, a UTC calendar date rendered as `YYYY-MM-DD` in keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Day(NaiveDate);

impl Day {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn today() -> Self {
        Self(Utc::now().date_naive())
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    pub fn previous(self) -> Option<Self> {
        self.0.checked_sub_days(Days::new(1)).map(Self)
    }

    pub fn offset(self, days: i64) -> Option<Self> {
        let shift = Days::new(days.unsigned_abs());

        if days >= 0 {
            self.0.checked_add_days(shift).map(Self)
        } else {
            self.0.checked_sub_days(shift).map(Self)
        }
    }

    /// Whole calendar days from `earlier` to `self`, negative when `earlier` is later.
    pub fn days_since(self, earlier: Day) -> i64 {
        (self.0 - earlier.0).num_days()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_FORMAT))
    }
}

impl FromStr for Day {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), DAY_FORMAT).map(Self)
    }
}

impl From<NaiveDate> for Day {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

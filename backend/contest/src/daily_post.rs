//! Lookups for the day's caption post. The external scheduler picks and
//! publishes the caption, then records it with [`Contest::record_daily_post`].
use crate::{Contest, day::Day, error::Result, keys, models::DailyPost};

impl Contest {
    pub async fn today_caption(&self, day: Day) -> Result<Option<String>> {
        self.store().get(&keys::daily_caption(day)).await
    }

    pub async fn today_post_id(&self, day: Day) -> Result<Option<String>> {
        self.store().get(&keys::daily_post_id(day)).await
    }

    pub async fn daily_post(&self, day: Day) -> Result<DailyPost> {
        Ok(DailyPost {
            day,
            caption: self.today_caption(day).await?,
            post_id: self.today_post_id(day).await?,
        })
    }

    pub async fn record_daily_post(&self, day: Day, caption: &str, post_id: &str) -> Result<()> {
        self.store().set(&keys::daily_caption(day), caption).await?;
        self.store().set(&keys::daily_post_id(day), post_id).await
    }
}

//! Time-windowed read-count aggregation.

use std::sync::Arc;

use chrono_tz::Tz;
use time::Date;
use tracing::debug;

use crate::application::{
    clock::Clock,
    error::StatsError,
    repos::{ContentTypesRepo, HotItemsQuery, ReadStatsRepo, RepoError},
};
use crate::domain::entities::ContentCategory;
use crate::domain::read_stats::{AggregatedWindow, DateRange, HotItem, rank_hot_items};
use crate::util::timezone::localized_date;

const DEFAULT_WINDOW_DAYS: u32 = 7;
const DEFAULT_HOT_LIMIT: u32 = 7;
pub const DEFAULT_BLOG_MODEL: &str = "blog";

/// Window sizes and calendar settings for read aggregation.
#[derive(Debug, Clone)]
pub struct StatsConfig {
    /// Days in the trend window and the multi-day ranking.
    pub window_days: u32,
    /// Length of the bounded rankings.
    pub hot_limit: u32,
    /// Zone whose calendar defines "today".
    pub timezone: Tz,
    /// Model name of the blog category.
    pub blog_model: String,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            hot_limit: DEFAULT_HOT_LIMIT,
            timezone: Tz::UTC,
            blog_model: DEFAULT_BLOG_MODEL.to_string(),
        }
    }
}

impl From<&crate::config::StatsSettings> for StatsConfig {
    fn from(settings: &crate::config::StatsSettings) -> Self {
        Self {
            window_days: settings.window_days.get(),
            hot_limit: settings.hot_limit.get(),
            timezone: settings.timezone,
            blog_model: settings.blog_model.clone(),
        }
    }
}

#[derive(Clone)]
pub struct ReadStatsService {
    reads: Arc<dyn ReadStatsRepo>,
    categories: Arc<dyn ContentTypesRepo>,
    clock: Arc<dyn Clock>,
    config: StatsConfig,
}

impl ReadStatsService {
    pub fn new(
        reads: Arc<dyn ReadStatsRepo>,
        categories: Arc<dyn ContentTypesRepo>,
        clock: Arc<dyn Clock>,
        config: StatsConfig,
    ) -> Self {
        Self {
            reads,
            categories,
            clock,
            config,
        }
    }

    /// Today's date on the site calendar.
    pub fn today(&self) -> Date {
        localized_date(self.clock.now(), self.config.timezone)
    }

    pub async fn resolve_category(&self, model: &str) -> Result<ContentCategory, StatsError> {
        self.categories
            .find_by_model(model)
            .await?
            .ok_or_else(|| StatsError::unknown_category(model))
    }

    /// Daily read totals for the `window_days` days before today, oldest first.
    pub async fn seven_days_read_data(
        &self,
        category: &ContentCategory,
    ) -> Result<AggregatedWindow, RepoError> {
        let range = DateRange::trailing(self.today(), self.config.window_days);
        let sums = self.reads.daily_read_sums(category.id, range).await?;
        let window = AggregatedWindow::from_daily_sums(&range, &sums);

        debug!(
            target = "blogsite::read_stats",
            category = %category.model,
            start = %range.start,
            end = %range.end,
            days = window.len(),
            "aggregated read window"
        );
        Ok(window)
    }

    /// Items read today, most read first. Reflects the partial current day.
    pub async fn today_hot_data(
        &self,
        category: &ContentCategory,
    ) -> Result<Vec<HotItem>, RepoError> {
        self.ranking(category.id, DateRange::day(self.today()), None)
            .await
    }

    /// The top `hot_limit` items read yesterday.
    pub async fn yesterday_hot_data(
        &self,
        category: &ContentCategory,
    ) -> Result<Vec<HotItem>, RepoError> {
        let today = self.today();
        let yesterday = today.previous_day().unwrap_or(today);
        self.ranking(
            category.id,
            DateRange::day(yesterday),
            Some(self.config.hot_limit),
        )
        .await
    }

    /// The top `hot_limit` blogs over the `window_days` days before today.
    pub async fn seven_days_hot_blogs(&self) -> Result<Vec<HotItem>, StatsError> {
        let blog = self.resolve_category(&self.config.blog_model).await?;
        let range = DateRange::trailing(self.today(), self.config.window_days);
        let items = self
            .ranking(blog.id, range, Some(self.config.hot_limit))
            .await?;
        Ok(items)
    }

    async fn ranking(
        &self,
        category_id: i32,
        range: DateRange,
        limit: Option<u32>,
    ) -> Result<Vec<HotItem>, RepoError> {
        let mut items = self
            .reads
            .hot_items(HotItemsQuery {
                category_id,
                range,
                limit,
            })
            .await?;

        rank_hot_items(&mut items);
        if let Some(limit) = limit {
            items.truncate(limit as usize);
        }
        Ok(items)
    }
}

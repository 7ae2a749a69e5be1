//! Landing-page dashboard assembly.

use std::time::Instant;

use metrics::histogram;
use serde::Serialize;
use time::Date;
use tracing::{debug, instrument};

use crate::application::{error::StatsError, read_stats::ReadStatsService};
use crate::cache::{CachedDataProvider, DatasetKey};
use crate::domain::read_stats::{AggregatedWindow, HotItem};

const METRIC_DASHBOARD_ASSEMBLE_MS: &str = "blogsite_dashboard_assemble_ms";

/// Everything the landing page shows. Keys are identical whether datasets
/// came from the cache or were recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeDashboard {
    pub dates: Vec<Date>,
    pub read_nums: Vec<i64>,
    pub today_hot_data: Vec<HotItem>,
    pub yesterday_hot_data: Vec<HotItem>,
    pub hot_blogs_for_7_days: Vec<HotItem>,
}

#[derive(Clone)]
pub struct HomeDashboardService {
    stats: ReadStatsService,
    provider: CachedDataProvider,
}

impl HomeDashboardService {
    pub fn new(stats: ReadStatsService, provider: CachedDataProvider) -> Self {
        Self { stats, provider }
    }

    /// Assemble the dashboard for the category named `model`.
    ///
    /// Today's ranking is always live; the other datasets go through the cache.
    #[instrument(skip(self))]
    pub async fn assemble(&self, model: &str) -> Result<HomeDashboard, StatsError> {
        let started_at = Instant::now();
        let category = self.stats.resolve_category(model).await?;

        let window_future = async {
            let key = DatasetKey::DatesAndReadNums;
            self.provider
                .get_or_compute(key.as_str(), || self.stats.seven_days_read_data(&category))
                .await
                .map_err(|err| StatsError::compute(key.as_str(), err))
        };
        let today_future = async {
            self.stats
                .today_hot_data(&category)
                .await
                .map_err(|err| StatsError::compute("today_hot_data", err))
        };
        let yesterday_future = async {
            let key = DatasetKey::HotBlogsForYesterday;
            self.provider
                .get_or_compute(key.as_str(), || self.stats.yesterday_hot_data(&category))
                .await
                .map_err(|err| StatsError::compute(key.as_str(), err))
        };
        let week_future = async {
            let key = DatasetKey::HotBlogsFor7Days;
            self.provider
                .get_or_compute(key.as_str(), || self.stats.seven_days_hot_blogs())
                .await
                .map_err(|err| match err {
                    StatsError::Repo(source) => StatsError::compute(key.as_str(), source),
                    other => other,
                })
        };

        let (window, today_hot_data, yesterday_hot_data, hot_blogs_for_7_days) =
            tokio::try_join!(window_future, today_future, yesterday_future, week_future)?;
        let AggregatedWindow { dates, read_nums } = window;

        let elapsed_ms = started_at.elapsed().as_secs_f64() * 1000.0;
        histogram!(METRIC_DASHBOARD_ASSEMBLE_MS).record(elapsed_ms);
        debug!(
            target = "blogsite::application::dashboard",
            model,
            elapsed_ms,
            today_items = today_hot_data.len(),
            "dashboard assembled"
        );

        Ok(HomeDashboard {
            dates,
            read_nums,
            today_hot_data,
            yesterday_hot_data,
            hot_blogs_for_7_days,
        })
    }
}

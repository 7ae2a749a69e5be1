#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use blogsite::application::clock::ManualClock;
use blogsite::application::comments::CommentService;
use blogsite::application::dashboard::HomeDashboardService;
use blogsite::application::read_stats::{ReadStatsService, StatsConfig};
use blogsite::application::repos::{
    CommentsRepo, ContentTypesRepo, HotItemsQuery, ReadStatsRepo, RepoError,
};
use blogsite::cache::{CacheConfig, CachedDataProvider, MemoryCacheStore};
use blogsite::domain::entities::{CommentRecord, ContentCategory};
use blogsite::domain::read_stats::{DailyReadSum, DateRange, HotItem};
use time::Date;
use time::macros::datetime;

pub const BLOG: i32 = 1;

/// Repository stub replaying canned rows for the `blog` category.
///
/// `hot` is the already ranked answer for any range covering `hot_on`;
/// `comments` are the roots of one object, newest first.
#[derive(Default)]
pub struct FixtureRepos {
    pub daily: Vec<DailyReadSum>,
    pub hot_on: Option<Date>,
    pub hot: Vec<HotItem>,
    pub comment_count: u64,
    pub comments: Vec<CommentRecord>,
}

#[async_trait]
impl ContentTypesRepo for FixtureRepos {
    async fn find_by_model(&self, model: &str) -> Result<Option<ContentCategory>, RepoError> {
        Ok((model == "blog").then(|| ContentCategory {
            id: BLOG,
            model: model.to_string(),
        }))
    }
}

#[async_trait]
impl ReadStatsRepo for FixtureRepos {
    async fn daily_read_sums(
        &self,
        _category_id: i32,
        range: DateRange,
    ) -> Result<Vec<DailyReadSum>, RepoError> {
        Ok(self
            .daily
            .iter()
            .filter(|sum| range.contains(sum.date))
            .cloned()
            .collect())
    }

    async fn hot_items(&self, query: HotItemsQuery) -> Result<Vec<HotItem>, RepoError> {
        if !self.hot_on.is_some_and(|date| query.range.contains(date)) {
            return Ok(Vec::new());
        }
        let limit = query.limit.map_or(usize::MAX, |limit| limit as usize);
        Ok(self.hot.iter().take(limit).cloned().collect())
    }
}

#[async_trait]
impl CommentsRepo for FixtureRepos {
    async fn count_comments(&self, _category_id: i32, _object_id: i64) -> Result<u64, RepoError> {
        Ok(self.comment_count)
    }

    async fn list_root_comments(
        &self,
        _category_id: i32,
        _object_id: i64,
    ) -> Result<Vec<CommentRecord>, RepoError> {
        Ok(self.comments.clone())
    }
}

pub struct Services {
    pub dashboard: Arc<HomeDashboardService>,
    pub comments: Arc<CommentService>,
    pub clock: Arc<ManualClock>,
}

pub fn services(repos: FixtureRepos) -> Services {
    let repos = Arc::new(repos);
    let clock = Arc::new(ManualClock::new(datetime!(2024-03-08 10:30 UTC)));
    let stats = ReadStatsService::new(
        repos.clone(),
        repos.clone(),
        clock.clone(),
        StatsConfig::default(),
    );
    let store = Arc::new(MemoryCacheStore::new(&CacheConfig::default(), clock.clone()));
    let provider = CachedDataProvider::new(store, Duration::from_secs(3600));

    Services {
        dashboard: Arc::new(HomeDashboardService::new(stats, provider)),
        comments: Arc::new(CommentService::new(repos.clone(), repos)),
        clock,
    }
}

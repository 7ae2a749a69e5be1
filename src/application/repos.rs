//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{CommentRecord, ContentCategory};
use crate::domain::read_stats::{DailyReadSum, DateRange, HotItem};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Group-by-item ranking request.
#[derive(Debug, Clone, Copy)]
pub struct HotItemsQuery {
    pub category_id: i32,
    pub range: DateRange,
    pub limit: Option<u32>,
}

#[async_trait]
pub trait ContentTypesRepo: Send + Sync {
    async fn find_by_model(&self, model: &str) -> Result<Option<ContentCategory>, RepoError>;
}

#[async_trait]
pub trait ReadStatsRepo: Send + Sync {
    /// Per-day sums of `read_num` for the category; days without events may be absent.
    async fn daily_read_sums(
        &self,
        category_id: i32,
        range: DateRange,
    ) -> Result<Vec<DailyReadSum>, RepoError>;

    /// Items with events in the range, ranked by summed `read_num` descending.
    async fn hot_items(&self, query: HotItemsQuery) -> Result<Vec<HotItem>, RepoError>;
}

#[async_trait]
pub trait CommentsRepo: Send + Sync {
    async fn count_comments(&self, category_id: i32, object_id: i64) -> Result<u64, RepoError>;

    /// Top-level comments, newest first.
    async fn list_root_comments(
        &self,
        category_id: i32,
        object_id: i64,
    ) -> Result<Vec<CommentRecord>, RepoError>;
}

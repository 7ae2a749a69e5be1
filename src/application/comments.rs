use std::sync::Arc;

use crate::application::{
    error::StatsError,
    repos::{CommentsRepo, ContentTypesRepo},
};
use crate::domain::comments::CommentFormInitial;
use crate::domain::entities::{CommentRecord, ContentCategory};

/// Comment lookups for a content item addressed by model name and id.
#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentsRepo>,
    categories: Arc<dyn ContentTypesRepo>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentsRepo>, categories: Arc<dyn ContentTypesRepo>) -> Self {
        Self {
            comments,
            categories,
        }
    }

    pub async fn comment_count(&self, model: &str, object_id: i64) -> Result<u64, StatsError> {
        let category = self.category(model).await?;
        Ok(self.comments.count_comments(category.id, object_id).await?)
    }

    /// Seed data for a top-level comment form on the item.
    pub async fn comment_form(
        &self,
        model: &str,
        object_id: i64,
    ) -> Result<CommentFormInitial, StatsError> {
        let category = self.category(model).await?;
        Ok(CommentFormInitial::top_level(category.model, object_id))
    }

    /// Top-level comments on the item, newest first.
    pub async fn comment_list(
        &self,
        model: &str,
        object_id: i64,
    ) -> Result<Vec<CommentRecord>, StatsError> {
        let category = self.category(model).await?;
        Ok(self
            .comments
            .list_root_comments(category.id, object_id)
            .await?)
    }

    async fn category(&self, model: &str) -> Result<ContentCategory, StatsError> {
        self.categories
            .find_by_model(model)
            .await?
            .ok_or_else(|| StatsError::unknown_category(model))
    }
}

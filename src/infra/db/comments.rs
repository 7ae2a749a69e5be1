use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    application::repos::{CommentsRepo, RepoError},
    domain::entities::CommentRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    object_id: i64,
    text: String,
    comment_time: OffsetDateTime,
    user_name: String,
    parent_id: Option<i64>,
    root_id: Option<i64>,
}

impl From<CommentRow> for CommentRecord {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            object_id: row.object_id,
            text: row.text,
            comment_time: row.comment_time,
            user_name: row.user_name,
            parent_id: row.parent_id,
            root_id: row.root_id,
        }
    }
}

#[async_trait]
impl CommentsRepo for PostgresRepositories {
    async fn count_comments(&self, category_id: i32, object_id: i64) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM comments
            WHERE content_type_id = $1 AND object_id = $2
            "#,
        )
        .bind(category_id)
        .bind(object_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Self::convert_count(count)
    }

    async fn list_root_comments(
        &self,
        category_id: i32,
        object_id: i64,
    ) -> Result<Vec<CommentRecord>, RepoError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, object_id, text, comment_time, user_name, parent_id, root_id
            FROM comments
            WHERE content_type_id = $1
              AND object_id = $2
              AND parent_id IS NULL
            ORDER BY comment_time DESC, id DESC
            "#,
        )
        .bind(category_id)
        .bind(object_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CommentRecord::from).collect())
    }
}

use async_trait::async_trait;

use crate::{
    application::repos::{ContentTypesRepo, RepoError},
    domain::entities::ContentCategory,
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct ContentTypeRow {
    id: i32,
    model: String,
}

impl From<ContentTypeRow> for ContentCategory {
    fn from(row: ContentTypeRow) -> Self {
        Self {
            id: row.id,
            model: row.model,
        }
    }
}

#[async_trait]
impl ContentTypesRepo for PostgresRepositories {
    async fn find_by_model(&self, model: &str) -> Result<Option<ContentCategory>, RepoError> {
        let row = sqlx::query_as::<_, ContentTypeRow>(
            r#"
            SELECT id, model
            FROM content_types
            WHERE model = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(model)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ContentCategory::from))
    }
}

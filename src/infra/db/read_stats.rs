use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use time::Date;

use crate::{
    application::repos::{HotItemsQuery, ReadStatsRepo, RepoError},
    domain::read_stats::{DailyReadSum, DateRange, HotItem},
};

use super::{PostgresRepositories, map_sqlx_error};

// Content type whose rows live in the `blogs` table.
const BLOG_APP_LABEL: &str = "blog";
const BLOG_MODEL: &str = "blog";

#[derive(sqlx::FromRow)]
struct DailyReadSumRow {
    date: Date,
    read_num: i64,
}

#[derive(sqlx::FromRow)]
struct HotItemRow {
    id: i64,
    title: String,
    read_num_sum: i64,
}

impl From<HotItemRow> for HotItem {
    fn from(row: HotItemRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            read_num_sum: row.read_num_sum,
        }
    }
}

#[async_trait]
impl ReadStatsRepo for PostgresRepositories {
    async fn daily_read_sums(
        &self,
        category_id: i32,
        range: DateRange,
    ) -> Result<Vec<DailyReadSum>, RepoError> {
        let rows = sqlx::query_as::<_, DailyReadSumRow>(
            r#"
            SELECT date, COALESCE(SUM(read_num), 0)::BIGINT AS read_num
            FROM read_details
            WHERE content_type_id = $1
              AND date >= $2
              AND date < $3
            GROUP BY date
            ORDER BY date
            "#,
        )
        .bind(category_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| DailyReadSum {
                date: row.date,
                read_num: row.read_num,
            })
            .collect())
    }

    async fn hot_items(&self, query: HotItemsQuery) -> Result<Vec<HotItem>, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT rd.object_id AS id, \
                    COALESCE(b.title, '') AS title, \
                    SUM(rd.read_num)::BIGINT AS read_num_sum \
             FROM read_details rd \
             JOIN content_types ct ON ct.id = rd.content_type_id \
             LEFT JOIN blogs b ON b.id = rd.object_id \
                AND ct.app_label = ",
        );
        qb.push_bind(BLOG_APP_LABEL);
        qb.push(" AND ct.model = ");
        qb.push_bind(BLOG_MODEL);
        qb.push(" WHERE rd.content_type_id = ");
        qb.push_bind(query.category_id);
        qb.push(" AND rd.date >= ");
        qb.push_bind(query.range.start);
        qb.push(" AND rd.date < ");
        qb.push_bind(query.range.end);
        qb.push(" GROUP BY rd.object_id, b.title ORDER BY read_num_sum DESC, rd.object_id ASC");

        if let Some(limit) = query.limit {
            qb.push(" LIMIT ");
            qb.push_bind(i64::from(limit));
        }

        let rows = qb
            .build_query_as::<HotItemRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(HotItem::from).collect())
    }
}

use std::sync::Arc;
use std::time::Duration;

use blogsite::application::clock::ManualClock;
use blogsite::application::dashboard::HomeDashboardService;
use blogsite::application::read_stats::{ReadStatsService, StatsConfig};
use blogsite::application::repos::{
    CommentsRepo, ContentTypesRepo, HotItemsQuery, ReadStatsRepo,
};
use blogsite::cache::{CacheConfig, CachedDataProvider, MemoryCacheStore};
use blogsite::domain::read_stats::DateRange;
use blogsite::infra::db::PostgresRepositories;
use sqlx::PgPool;
use time::Date;
use time::macros::{date, datetime};

async fn blog_type_id(pool: &PgPool) -> i32 {
    sqlx::query_scalar("SELECT id FROM content_types WHERE model = 'blog'")
        .fetch_one(pool)
        .await
        .expect("blog content type is seeded")
}

async fn insert_blog(pool: &PgPool, id: i64, title: &str) {
    sqlx::query("INSERT INTO blogs (id, title) VALUES ($1, $2)")
        .bind(id)
        .bind(title)
        .execute(pool)
        .await
        .expect("insert blog");
}

async fn insert_read(pool: &PgPool, content_type_id: i32, object_id: i64, date: Date, read_num: i64) {
    sqlx::query(
        "INSERT INTO read_details (content_type_id, object_id, date, read_num) VALUES ($1, $2, $3, $4)",
    )
    .bind(content_type_id)
    .bind(object_id)
    .bind(date)
    .bind(read_num)
    .execute(pool)
    .await
    .expect("insert read detail");
}

async fn insert_comment(
    pool: &PgPool,
    content_type_id: i32,
    object_id: i64,
    minute: u8,
    parent_id: Option<i64>,
) -> i64 {
    let comment_time = datetime!(2024-03-08 09:00 UTC)
        .replace_minute(minute)
        .expect("valid minute");
    sqlx::query_scalar(
        r#"
        INSERT INTO comments (content_type_id, object_id, text, comment_time, user_name, parent_id, root_id)
        VALUES ($1, $2, 'hello', $3, 'reader', $4, $4)
        RETURNING id
        "#,
    )
    .bind(content_type_id)
    .bind(object_id)
    .bind(comment_time)
    .bind(parent_id)
    .fetch_one(pool)
    .await
    .expect("insert comment")
}

#[sqlx::test(migrations = "./migrations")]
async fn content_type_lookup_resolves_seeded_blog(pool: PgPool) {
    let repos = PostgresRepositories::new(pool.clone());

    let blog = repos
        .find_by_model("blog")
        .await
        .expect("lookup blog")
        .expect("blog exists");
    assert_eq!(blog.id, blog_type_id(&pool).await);
    assert_eq!(blog.model, "blog");

    assert!(repos.find_by_model("photo").await.expect("lookup").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn daily_sums_group_by_date_within_half_open_range(pool: PgPool) {
    let repos = PostgresRepositories::new(pool.clone());
    let blog = blog_type_id(&pool).await;

    insert_read(&pool, blog, 1, date!(2024 - 03 - 05), 2).await;
    insert_read(&pool, blog, 2, date!(2024 - 03 - 05), 3).await;
    insert_read(&pool, blog, 1, date!(2024 - 03 - 07), 4).await;
    insert_read(&pool, blog, 1, date!(2024 - 03 - 08), 100).await;
    insert_read(&pool, blog, 1, date!(2024 - 02 - 29), 100).await;

    let range = DateRange::trailing(date!(2024 - 03 - 08), 7);
    let sums = repos.daily_read_sums(blog, range).await.expect("daily sums");

    let pairs: Vec<(Date, i64)> = sums.iter().map(|sum| (sum.date, sum.read_num)).collect();
    assert_eq!(
        pairs,
        vec![(date!(2024 - 03 - 05), 5), (date!(2024 - 03 - 07), 4)]
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn hot_items_rank_by_sum_with_titles_and_limit(pool: PgPool) {
    let repos = PostgresRepositories::new(pool.clone());
    let blog = blog_type_id(&pool).await;

    insert_blog(&pool, 1, "First").await;
    insert_blog(&pool, 2, "Second").await;
    insert_read(&pool, blog, 1, date!(2024 - 03 - 07), 6).await;
    insert_read(&pool, blog, 1, date!(2024 - 03 - 07), 4).await;
    insert_read(&pool, blog, 2, date!(2024 - 03 - 07), 3).await;
    insert_read(&pool, blog, 3, date!(2024 - 03 - 07), 1).await;

    let all = repos
        .hot_items(HotItemsQuery {
            category_id: blog,
            range: DateRange::day(date!(2024 - 03 - 07)),
            limit: None,
        })
        .await
        .expect("hot items");

    let ranked: Vec<(i64, &str, i64)> = all
        .iter()
        .map(|item| (item.id, item.title.as_str(), item.read_num_sum))
        .collect();
    assert_eq!(ranked, vec![(1, "First", 10), (2, "Second", 3), (3, "", 1)]);

    let limited = repos
        .hot_items(HotItemsQuery {
            category_id: blog,
            range: DateRange::day(date!(2024 - 03 - 07)),
            limit: Some(2),
        })
        .await
        .expect("limited hot items");
    assert_eq!(limited.len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn hot_items_of_other_categories_never_borrow_blog_titles(pool: PgPool) {
    let repos = PostgresRepositories::new(pool.clone());
    let note: i32 = sqlx::query_scalar(
        "INSERT INTO content_types (app_label, model) VALUES ('notes', 'note') RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .expect("insert note content type");

    insert_blog(&pool, 1, "First").await;
    insert_read(&pool, note, 1, date!(2024 - 03 - 07), 5).await;

    let items = repos
        .hot_items(HotItemsQuery {
            category_id: note,
            range: DateRange::day(date!(2024 - 03 - 07)),
            limit: None,
        })
        .await
        .expect("hot items");

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, 1);
    assert_eq!(items[0].title, "");
    assert_eq!(items[0].read_num_sum, 5);
}

#[sqlx::test(migrations = "./migrations")]
async fn comments_are_counted_and_listed_newest_first(pool: PgPool) {
    let repos = PostgresRepositories::new(pool.clone());
    let blog = blog_type_id(&pool).await;

    let first = insert_comment(&pool, blog, 10, 1, None).await;
    let second = insert_comment(&pool, blog, 10, 5, None).await;
    insert_comment(&pool, blog, 10, 9, Some(first)).await;
    insert_comment(&pool, blog, 11, 2, None).await;

    assert_eq!(repos.count_comments(blog, 10).await.expect("count"), 3);
    assert_eq!(repos.count_comments(blog, 99).await.expect("count"), 0);

    let roots = repos.list_root_comments(blog, 10).await.expect("list");
    let ids: Vec<i64> = roots.iter().map(|comment| comment.id).collect();
    assert_eq!(ids, vec![second, first]);
}

#[sqlx::test(migrations = "./migrations")]
async fn dashboard_assembles_against_postgres(pool: PgPool) {
    let repos = Arc::new(PostgresRepositories::new(pool.clone()));
    let blog = blog_type_id(&pool).await;

    insert_blog(&pool, 1, "First").await;
    insert_read(&pool, blog, 1, date!(2024 - 03 - 07), 10).await;
    insert_read(&pool, blog, 1, date!(2024 - 03 - 08), 2).await;

    let clock = Arc::new(ManualClock::new(datetime!(2024-03-08 12:00 UTC)));
    let stats = ReadStatsService::new(
        repos.clone(),
        repos.clone(),
        clock.clone(),
        StatsConfig::default(),
    );
    let store = Arc::new(MemoryCacheStore::new(&CacheConfig::default(), clock));
    let dashboard = HomeDashboardService::new(
        stats,
        CachedDataProvider::new(store, Duration::from_secs(3600)),
    );

    let result = dashboard.assemble("blog").await.expect("assemble dashboard");

    assert_eq!(result.read_nums, vec![0, 0, 0, 0, 0, 0, 10]);
    assert_eq!(result.today_hot_data[0].read_num_sum, 2);
    assert_eq!(result.yesterday_hot_data[0].title, "First");
    assert_eq!(result.hot_blogs_for_7_days[0].read_num_sum, 10);
}

//! In-memory repositories shared by service unit tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use time::Date;

use crate::application::repos::{
    CommentsRepo, ContentTypesRepo, HotItemsQuery, ReadStatsRepo, RepoError,
};
use crate::domain::entities::{CommentRecord, ContentCategory, ReadEvent};
use crate::domain::read_stats::{DailyReadSum, DateRange, HotItem};

pub(crate) const BLOG_CATEGORY_ID: i32 = 1;

pub(crate) fn blog_category() -> ContentCategory {
    ContentCategory {
        id: BLOG_CATEGORY_ID,
        model: "blog".to_string(),
    }
}

pub(crate) fn event(object_id: i64, date: Date, read_num: i64) -> ReadEvent {
    ReadEvent {
        content_type: BLOG_CATEGORY_ID,
        object_id,
        date,
        read_num,
    }
}

/// Evaluates repository queries over plain vectors.
pub(crate) struct InMemoryRepos {
    categories: Vec<ContentCategory>,
    events: Vec<ReadEvent>,
    titles: HashMap<i64, String>,
    comments: Vec<(i32, CommentRecord)>,
    failing: bool,
    pub(crate) read_queries: AtomicUsize,
}

impl Default for InMemoryRepos {
    fn default() -> Self {
        Self {
            categories: vec![blog_category()],
            events: Vec::new(),
            titles: HashMap::new(),
            comments: Vec::new(),
            failing: false,
            read_queries: AtomicUsize::new(0),
        }
    }
}

impl InMemoryRepos {
    pub(crate) fn with_events(mut self, events: impl IntoIterator<Item = ReadEvent>) -> Self {
        self.events.extend(events);
        self
    }

    pub(crate) fn with_title(mut self, id: i64, title: &str) -> Self {
        self.titles.insert(id, title.to_string());
        self
    }

    pub(crate) fn with_category(mut self, id: i32, model: &str) -> Self {
        self.categories.push(ContentCategory {
            id,
            model: model.to_string(),
        });
        self
    }

    pub(crate) fn with_comment(mut self, category_id: i32, comment: CommentRecord) -> Self {
        self.comments.push((category_id, comment));
        self
    }

    pub(crate) fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    fn check(&self) -> Result<(), RepoError> {
        if self.failing {
            return Err(RepoError::from_persistence("database is gone"));
        }
        Ok(())
    }

    fn in_scope<'a>(
        &'a self,
        category_id: i32,
        range: DateRange,
    ) -> impl Iterator<Item = &'a ReadEvent> + 'a {
        self.events
            .iter()
            .filter(move |event| event.content_type == category_id && range.contains(event.date))
    }
}

#[async_trait]
impl ContentTypesRepo for InMemoryRepos {
    async fn find_by_model(&self, model: &str) -> Result<Option<ContentCategory>, RepoError> {
        self.check()?;
        Ok(self
            .categories
            .iter()
            .find(|category| category.model == model)
            .cloned())
    }
}

#[async_trait]
impl ReadStatsRepo for InMemoryRepos {
    async fn daily_read_sums(
        &self,
        category_id: i32,
        range: DateRange,
    ) -> Result<Vec<DailyReadSum>, RepoError> {
        self.check()?;
        self.read_queries.fetch_add(1, Ordering::SeqCst);

        let mut by_date: BTreeMap<Date, i64> = BTreeMap::new();
        for event in self.in_scope(category_id, range) {
            *by_date.entry(event.date).or_default() += event.read_num;
        }
        Ok(by_date
            .into_iter()
            .map(|(date, read_num)| DailyReadSum { date, read_num })
            .collect())
    }

    async fn hot_items(&self, query: HotItemsQuery) -> Result<Vec<HotItem>, RepoError> {
        self.check()?;
        self.read_queries.fetch_add(1, Ordering::SeqCst);

        let mut by_item: HashMap<i64, i64> = HashMap::new();
        for event in self.in_scope(query.category_id, query.range) {
            *by_item.entry(event.object_id).or_default() += event.read_num;
        }

        let mut items: Vec<HotItem> = by_item
            .into_iter()
            .map(|(id, read_num_sum)| HotItem {
                id,
                title: self.titles.get(&id).cloned().unwrap_or_default(),
                read_num_sum,
            })
            .collect();
        crate::domain::read_stats::rank_hot_items(&mut items);
        if let Some(limit) = query.limit {
            items.truncate(limit as usize);
        }
        Ok(items)
    }
}

#[async_trait]
impl CommentsRepo for InMemoryRepos {
    async fn count_comments(&self, category_id: i32, object_id: i64) -> Result<u64, RepoError> {
        self.check()?;
        Ok(self
            .comments
            .iter()
            .filter(|(category, comment)| *category == category_id && comment.object_id == object_id)
            .count() as u64)
    }

    async fn list_root_comments(
        &self,
        category_id: i32,
        object_id: i64,
    ) -> Result<Vec<CommentRecord>, RepoError> {
        self.check()?;
        let mut roots: Vec<CommentRecord> = self
            .comments
            .iter()
            .filter(|(category, comment)| {
                *category == category_id
                    && comment.object_id == object_id
                    && comment.parent_id.is_none()
            })
            .map(|(_, comment)| comment.clone())
            .collect();
        roots.sort_by(|a, b| b.comment_time.cmp(&a.comment_time));
        Ok(roots)
    }
}

//! Domain entities mirrored from persistent storage.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// Resolved category discriminator scoping read events and comments to one model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentCategory {
    pub id: i32,
    pub model: String,
}

/// One observation of read activity for a content item on a calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadEvent {
    pub content_type: i32,
    pub object_id: i64,
    pub date: Date,
    pub read_num: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentRecord {
    pub id: i64,
    pub object_id: i64,
    pub text: String,
    pub comment_time: OffsetDateTime,
    pub user_name: String,
    pub parent_id: Option<i64>,
    pub root_id: Option<i64>,
}

//! Comment form seed data.

use serde::{Deserialize, Serialize};

/// Initial values for a comment form attached to one content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentFormInitial {
    pub content_type: String,
    pub object_id: i64,
    pub reply_comment_id: i64,
}

impl CommentFormInitial {
    /// A form for a new top-level comment.
    pub fn top_level(content_type: impl Into<String>, object_id: i64) -> Self {
        Self {
            content_type: content_type.into(),
            object_id,
            reply_comment_id: 0,
        }
    }
}

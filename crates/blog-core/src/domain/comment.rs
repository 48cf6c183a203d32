use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::post::Post;
use crate::error::DomainError;

/// Comment entity - reader feedback attached to exactly one post.
///
/// `active = false` hides a comment without deleting it. Unlike [`Post`],
/// `updated` is refreshed every time the comment is saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    #[validate(length(min = 1, max = 80))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub body: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub active: bool,
}

impl Comment {
    /// Create a new, active comment on `post_id`.
    pub fn new(post_id: Uuid, name: String, email: String, body: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            post_id,
            name,
            email,
            body,
            created: now,
            updated: now,
            active: true,
        }
    }

    /// Pair the comment with its owning post for display.
    pub fn on<'a>(&'a self, post: &'a Post) -> CommentOnPost<'a> {
        CommentOnPost {
            comment: self,
            post,
        }
    }

    pub fn ensure_valid(&self) -> Result<(), DomainError> {
        self.validate()?;
        Ok(())
    }
}

/// Display adapter rendering `Comment by {name} on {post}`.
pub struct CommentOnPost<'a> {
    comment: &'a Comment,
    post: &'a Post,
}

impl fmt::Display for CommentOnPost<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Comment by {} on {}", self.comment.name, self.post)
    }
}

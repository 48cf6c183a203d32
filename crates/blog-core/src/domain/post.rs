use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::route::PostDetailRoute;
use super::slug::is_valid_slug;
use crate::error::DomainError;

/// Publication workflow state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(DomainError::Validation(format!(
                "unknown post status '{}'",
                other
            ))),
        }
    }
}

/// Post entity - an authored blog article with a draft/published lifecycle.
///
/// `created` and `updated` are both stamped once, at construction. Saving an
/// existing post never touches them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    #[validate(length(min = 1, max = 250))]
    pub title: String,
    #[validate(length(min = 1, max = 250))]
    pub slug: String,
    pub body: String,
    pub publish: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub status: PostStatus,
}

impl Post {
    /// Create a new draft post published "now".
    pub fn new(author_id: Uuid, title: String, slug: String, body: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            slug,
            body,
            publish: now,
            created: now,
            updated: now,
            status: PostStatus::Draft,
        }
    }

    pub fn with_publish(mut self, publish: DateTime<Utc>) -> Self {
        self.publish = publish;
        self
    }

    pub fn with_status(mut self, status: PostStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Calendar day (UTC) of `publish`; scopes slug uniqueness.
    pub fn publish_day(&self) -> NaiveDate {
        self.publish.date_naive()
    }

    /// Canonical detail path, e.g. `/blog/2024/3/7/hello-world/`.
    pub fn absolute_url(&self) -> String {
        self.route().to_string()
    }

    pub fn route(&self) -> PostDetailRoute {
        PostDetailRoute::for_post(self)
    }

    /// Field-level checks: title and slug lengths, slug charset.
    pub fn ensure_valid(&self) -> Result<(), DomainError> {
        self.validate()?;
        if !is_valid_slug(&self.slug) {
            return Err(DomainError::Validation(format!(
                "slug '{}' may only contain letters, numbers, underscores or hyphens",
                self.slug
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Keep only published posts, preserving order.
pub fn published_only(posts: impl IntoIterator<Item = Post>) -> Vec<Post> {
    posts.into_iter().filter(Post::is_published).collect()
}

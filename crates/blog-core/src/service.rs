//! Blog workflows on top of the repository ports.

use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::domain::{Comment, Post, PostDetailRoute, PostStatus, Tag, User, validate_tag_names};
use crate::error::{DomainError, RepoError};
use crate::ports::{CommentRepository, PostRepository, UserRepository};

/// Authoring, reading and moderation of posts and comments.
#[derive(Clone)]
pub struct BlogService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl BlogService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            users,
            posts,
            comments,
        }
    }

    #[instrument(skip(self))]
    pub async fn register_author(&self, username: &str, email: &str) -> Result<User, DomainError> {
        let user = User::new(username.to_string(), email.to_string());
        user.ensure_valid()?;

        if self.users.find_by_username(username).await?.is_some() {
            return Err(DomainError::Duplicate(format!(
                "username '{}' is taken",
                username
            )));
        }

        Ok(self.users.save(user).await?)
    }

    /// Store a new post. Reusing an existing id or clashing on
    /// (publish day, slug) is reported as [`DomainError::Duplicate`].
    #[instrument(skip(self, post), fields(post_id = %post.id, slug = %post.slug))]
    pub async fn create_post(&self, post: Post) -> Result<Post, DomainError> {
        post.ensure_valid()?;
        self.require_author(post.author_id).await?;

        if self.posts.find_by_id(post.id).await?.is_some() {
            return Err(DomainError::Duplicate(format!("post {} already exists", post.id)));
        }

        let saved = self.posts.save(post).await?;
        tracing::info!(status = %saved.status, "Post created");
        Ok(saved)
    }

    /// Persist edits to an existing post. `created` and `updated` keep the
    /// values stamped at creation.
    #[instrument(skip(self, post), fields(post_id = %post.id))]
    pub async fn update_post(&self, post: Post) -> Result<Post, DomainError> {
        post.ensure_valid()?;
        self.require_post(post.id).await?;
        self.require_author(post.author_id).await?;
        Ok(self.posts.save(post).await?)
    }

    pub async fn publish_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.set_status(id, PostStatus::Published).await
    }

    pub async fn retract_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.set_status(id, PostStatus::Draft).await
    }

    #[instrument(skip(self))]
    async fn set_status(&self, id: Uuid, status: PostStatus) -> Result<Post, DomainError> {
        let mut post = self.require_post(id).await?;
        if post.status == status {
            return Ok(post);
        }
        post.status = status;
        let saved = self.posts.save(post).await?;
        tracing::info!(%status, "Post status changed");
        Ok(saved)
    }

    pub async fn published_posts(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.list_published().await?)
    }

    pub async fn published_posts_tagged(&self, tag_slug: &str) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.list_published_by_tag(tag_slug).await?)
    }

    /// Resolve a detail route to its post. Drafts are not visible here.
    #[instrument(skip(self), fields(route = %route))]
    pub async fn post_detail(&self, route: &PostDetailRoute) -> Result<Post, DomainError> {
        let date = route.date().ok_or_else(|| {
            DomainError::Validation(format!(
                "{}-{}-{} is not a calendar date",
                route.year, route.month, route.day
            ))
        })?;

        match self.posts.find_by_date_and_slug(date, &route.slug).await? {
            Some(post) if post.is_published() => Ok(post),
            _ => Err(DomainError::PostNotFound {
                date,
                slug: route.slug.clone(),
            }),
        }
    }

    #[instrument(skip(self, names))]
    pub async fn tag_post(&self, post_id: Uuid, names: &[String]) -> Result<Vec<Tag>, DomainError> {
        validate_tag_names(names)?;
        self.require_post(post_id).await?;
        Ok(self.posts.set_tags(post_id, names).await?)
    }

    #[instrument(skip(self, body))]
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        name: &str,
        email: &str,
        body: &str,
    ) -> Result<Comment, DomainError> {
        self.require_post(post_id).await?;

        let comment = Comment::new(
            post_id,
            name.to_string(),
            email.to_string(),
            body.to_string(),
        );
        comment.ensure_valid()?;

        Ok(self.comments.save(comment).await?)
    }

    /// Visible comments on a post, oldest first.
    pub async fn comments_for(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        Ok(self.comments.list_active_for_post(post_id).await?)
    }

    /// Hide (`active = false`) or restore a comment.
    #[instrument(skip(self))]
    pub async fn moderate_comment(&self, id: Uuid, active: bool) -> Result<Comment, DomainError> {
        match self.comments.set_active(id, active).await {
            Ok(comment) => {
                tracing::info!(active, "Comment moderated");
                Ok(comment)
            }
            Err(RepoError::NotFound) => Err(DomainError::NotFound {
                entity_type: "Comment",
                id,
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a post along with its comments and tag links.
    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: Uuid) -> Result<(), DomainError> {
        self.posts
            .delete(id)
            .await
            .map_err(|e| not_found_as(e, "Post", id))
    }

    /// Delete an author along with every post they wrote.
    #[instrument(skip(self))]
    pub async fn delete_author(&self, id: Uuid) -> Result<(), DomainError> {
        self.users
            .delete(id)
            .await
            .map_err(|e| not_found_as(e, "User", id))
    }

    async fn require_author(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "User",
                id,
            })
    }

    async fn require_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "Post",
                id,
            })
    }
}

fn not_found_as(err: RepoError, entity_type: &'static str, id: Uuid) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::NotFound { entity_type, id },
        other => other.into(),
    }
}

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Comment, Post, Tag, User, published_only};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID, cascading to everything it owns.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
///
/// Listing methods return posts newest `publish` first.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Every post, whatever its status.
    async fn list(&self) -> Result<Vec<Post>, RepoError>;

    /// Only posts with `status = published`.
    async fn list_published(&self) -> Result<Vec<Post>, RepoError> {
        Ok(published_only(self.list().await?))
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// The post whose publish day and slug match, any status.
    async fn find_by_date_and_slug(
        &self,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError>;

    /// Replace the post's tag set, creating missing tags. Returns the new set.
    async fn set_tags(&self, post_id: Uuid, names: &[String]) -> Result<Vec<Tag>, RepoError>;

    /// Tags on a post, ordered by name.
    async fn tags_for(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError>;

    /// Published posts carrying the tag with `tag_slug`.
    async fn list_published_by_tag(&self, tag_slug: &str) -> Result<Vec<Post>, RepoError>;
}

/// Comment repository.
///
/// Listing methods return comments oldest `created` first.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Every comment on a post, hidden ones included.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    async fn list_active_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let comments = self.list_for_post(post_id).await?;
        Ok(comments.into_iter().filter(|c| c.active).collect())
    }

    /// Show or hide a comment. Counts as a save, so `updated` moves.
    async fn set_active(&self, id: Uuid, active: bool) -> Result<Comment, RepoError> {
        let mut comment = self.find_by_id(id).await?.ok_or(RepoError::NotFound)?;
        comment.active = active;
        self.save(comment).await
    }
}

//! In-memory repositories - used when no database is configured.
//!
//! All three repositories share one [`StoreState`] behind an async `RwLock`,
//! so foreign keys, the (publish day, slug) unique index and the cascades
//! are checked under a single write guard, the way the database would.
//! Data is lost on process restart.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::{Comment, Post, Tag, User, normalize_tag_names};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, CommentRepository, PostRepository, UserRepository};

#[derive(Default)]
struct StoreState {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    tags: HashMap<Uuid, Tag>,
    // (post_id, tag_id)
    post_tags: HashSet<(Uuid, Uuid)>,
}

impl StoreState {
    fn remove_user(&mut self, id: Uuid) -> Option<User> {
        let user = self.users.remove(&id)?;
        let owned: Vec<Uuid> = self
            .posts
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in owned {
            self.remove_post(post_id);
        }
        Some(user)
    }

    fn remove_post(&mut self, id: Uuid) -> Option<Post> {
        let post = self.posts.remove(&id)?;
        self.comments.retain(|_, c| c.post_id != id);
        self.post_tags.retain(|(post_id, _)| *post_id != id);
        Some(post)
    }

    fn tags_of(&self, post_id: Uuid) -> Vec<Tag> {
        let mut tags: Vec<Tag> = self
            .post_tags
            .iter()
            .filter(|(p, _)| *p == post_id)
            .filter_map(|(_, t)| self.tags.get(t).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        tags
    }

    fn newest_first(mut posts: Vec<Post>) -> Vec<Post> {
        posts.sort_by(|a, b| b.publish.cmp(&a.publish));
        posts
    }
}

/// Shared in-memory storage for users, posts, comments and tags.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            state: self.state.clone(),
        }
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            state: self.state.clone(),
        }
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryCommentRepository {
            state: self.state.clone(),
        }
    }
}

/// In-memory user repository.
pub struct InMemoryUserRepository {
    state: Arc<RwLock<StoreState>>,
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut state = self.state.write().await;

        let taken = state
            .users
            .values()
            .any(|u| u.id != user.id && u.username == user.username);
        if taken {
            return Err(RepoError::Constraint(format!(
                "username '{}' already exists",
                user.username
            )));
        }

        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        state.remove_user(id).ok_or(RepoError::NotFound)?;
        tracing::debug!(user_id = %id, "User deleted with their posts");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

/// In-memory post repository.
pub struct InMemoryPostRepository {
    state: Arc<RwLock<StoreState>>,
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.state.read().await.posts.get(&id).cloned())
    }

    async fn save(&self, mut post: Post) -> Result<Post, RepoError> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&post.author_id) {
            return Err(RepoError::ForeignKey(format!(
                "author {} does not exist",
                post.author_id
            )));
        }

        let day = post.publish_day();
        let clash = state
            .posts
            .values()
            .any(|p| p.id != post.id && p.slug == post.slug && p.publish_day() == day);
        if clash {
            return Err(RepoError::Constraint(format!(
                "slug '{}' already used on {}",
                post.slug, day
            )));
        }

        if let Some(existing) = state.posts.get(&post.id) {
            post.created = existing.created;
            post.updated = existing.updated;
        }

        state.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        state.remove_post(id).ok_or(RepoError::NotFound)?;
        tracing::debug!(post_id = %id, "Post deleted with its comments");
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let state = self.state.read().await;
        Ok(StoreState::newest_first(
            state.posts.values().cloned().collect(),
        ))
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let state = self.state.read().await;
        Ok(StoreState::newest_first(
            state
                .posts
                .values()
                .filter(|p| p.author_id == author_id)
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_date_and_slug(
        &self,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError> {
        let state = self.state.read().await;
        Ok(state
            .posts
            .values()
            .find(|p| p.slug == slug && p.publish_day() == date)
            .cloned())
    }

    async fn set_tags(&self, post_id: Uuid, names: &[String]) -> Result<Vec<Tag>, RepoError> {
        let mut state = self.state.write().await;

        if !state.posts.contains_key(&post_id) {
            return Err(RepoError::ForeignKey(format!(
                "post {} does not exist",
                post_id
            )));
        }

        state.post_tags.retain(|(p, _)| *p != post_id);

        for (name, slug) in normalize_tag_names(names) {
            let existing = state.tags.values().find(|t| t.slug == slug).map(|t| t.id);
            let tag_id = match existing {
                Some(id) => id,
                None => {
                    let tag = Tag::new(&name);
                    let id = tag.id;
                    state.tags.insert(id, tag);
                    id
                }
            };
            state.post_tags.insert((post_id, tag_id));
        }

        Ok(state.tags_of(post_id))
    }

    async fn tags_for(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError> {
        Ok(self.state.read().await.tags_of(post_id))
    }

    async fn list_published_by_tag(&self, tag_slug: &str) -> Result<Vec<Post>, RepoError> {
        let state = self.state.read().await;

        let Some(tag) = state.tags.values().find(|t| t.slug == tag_slug) else {
            return Ok(Vec::new());
        };

        let posts = state
            .post_tags
            .iter()
            .filter(|(_, t)| *t == tag.id)
            .filter_map(|(p, _)| state.posts.get(p))
            .filter(|p| p.is_published())
            .cloned()
            .collect();

        Ok(StoreState::newest_first(posts))
    }
}

/// In-memory comment repository.
pub struct InMemoryCommentRepository {
    state: Arc<RwLock<StoreState>>,
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.state.read().await.comments.get(&id).cloned())
    }

    async fn save(&self, mut comment: Comment) -> Result<Comment, RepoError> {
        let mut state = self.state.write().await;

        if let Some(existing) = state.comments.get(&comment.id) {
            // The owning post is fixed at insert.
            comment.post_id = existing.post_id;
            comment.created = existing.created;
            comment.updated = Utc::now();
        } else if !state.posts.contains_key(&comment.post_id) {
            return Err(RepoError::ForeignKey(format!(
                "post {} does not exist",
                comment.post_id
            )));
        }

        state.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        state.comments.remove(&id).ok_or(RepoError::NotFound)?;
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let state = self.state.read().await;
        let mut comments: Vec<Comment> = state
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created.cmp(&b.created));
        Ok(comments)
    }
}

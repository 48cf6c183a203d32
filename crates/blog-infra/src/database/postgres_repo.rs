//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use blog_core::domain::{Comment, Post, Tag, User, normalize_tag_names};
use blog_core::error::RepoError;
use blog_core::ports::{CommentRepository, PostRepository, UserRepository};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_desc(post::Column::Publish)
            .all(self.db())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_published(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Status.eq(post::Status::Published))
            .order_by_desc(post::Column::Publish)
            .all(self.db())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_desc(post::Column::Publish)
            .all(self.db())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_date_and_slug(
        &self,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError> {
        tracing::debug!(%date, slug, "Finding post by publish day and slug");

        let result = PostEntity::find()
            .filter(post::Column::PublishDay.eq(date))
            .filter(post::Column::Slug.eq(slug))
            .one(self.db())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn set_tags(&self, post_id: Uuid, names: &[String]) -> Result<Vec<Tag>, RepoError> {
        let txn = self.db().begin().await.map_err(map_db_err)?;

        PostTagEntity::delete_many()
            .filter(post_tag::Column::PostId.eq(post_id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        let mut tags = Vec::new();
        for (name, slug) in normalize_tag_names(names) {
            let existing = TagEntity::find()
                .filter(tag::Column::Slug.eq(slug.as_str()))
                .one(&txn)
                .await
                .map_err(map_db_err)?;

            let model = match existing {
                Some(model) => model,
                None => tag::ActiveModel::from(Tag::new(&name))
                    .insert(&txn)
                    .await
                    .map_err(map_db_err)?,
            };

            post_tag::ActiveModel {
                post_id: Set(post_id),
                tag_id: Set(model.id),
            }
            .insert(&txn)
            .await
            .map_err(map_db_err)?;

            tags.push(Tag::from(model));
        }

        txn.commit().await.map_err(map_db_err)?;
        tracing::debug!(%post_id, count = tags.len(), "Post tags replaced");

        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn tags_for(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .inner_join(PostTagEntity)
            .filter(post_tag::Column::PostId.eq(post_id))
            .order_by_asc(tag::Column::Name)
            .all(self.db())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_published_by_tag(&self, tag_slug: &str) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .inner_join(TagEntity)
            .filter(tag::Column::Slug.eq(tag_slug))
            .filter(post::Column::Status.eq(post::Status::Published))
            .order_by_desc(post::Column::Publish)
            .all(self.db())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::Created)
            .all(self.db())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_active_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::Active.eq(true))
            .order_by_asc(comment::Column::Created)
            .all(self.db())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

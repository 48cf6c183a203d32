//! Comment entity for SeaORM.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ConnectionTrait, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub post_id: Uuid,
    pub name: String,
    pub email: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub created: DateTimeWithTimeZone,
    pub updated: DateTimeWithTimeZone,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        // The owning post and `created` are fixed at insert; `updated`
        // moves on every later save.
        if !insert {
            self.post_id = ActiveValue::NotSet;
            self.created = ActiveValue::NotSet;
            self.updated = Set(Utc::now().into());
        }
        Ok(self)
    }
}

/// Conversion from SeaORM Model to Domain Comment.
impl From<Model> for blog_core::domain::Comment {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            post_id: model.post_id,
            name: model.name,
            email: model.email,
            body: model.body,
            created: model.created.into(),
            updated: model.updated.into(),
            active: model.active,
        }
    }
}

/// Conversion from Domain Comment to SeaORM ActiveModel.
impl From<blog_core::domain::Comment> for ActiveModel {
    fn from(comment: blog_core::domain::Comment) -> Self {
        Self {
            id: Set(comment.id),
            post_id: Set(comment.post_id),
            name: Set(comment.name),
            email: Set(comment.email),
            body: Set(comment.body),
            created: Set(comment.created.into()),
            updated: Set(comment.updated.into()),
            active: Set(comment.active),
        }
    }
}

//! Users, posts, comments and tags.
//!
//! `posts.publish_day` is written by the application alongside `publish`
//! so that "one slug per publish day" is an ordinary unique index.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(users_table()).await?;
        manager.create_table(posts_table()).await?;
        manager.create_index(posts_day_slug_index()).await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_posts_publish")
                    .table(Posts::Table)
                    .col(Posts::Publish)
                    .to_owned(),
            )
            .await?;
        manager.create_table(comments_table()).await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_comments_post_created")
                    .table(Comments::Table)
                    .col(Comments::PostId)
                    .col(Comments::Created)
                    .to_owned(),
            )
            .await?;
        manager.create_table(tags_table()).await?;
        manager.create_table(post_tags_table()).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PostTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Comments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

fn users_table() -> TableCreateStatement {
    Table::create()
        .table(Users::Table)
        .if_not_exists()
        .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
        .col(
            ColumnDef::new(Users::Username)
                .string_len(150)
                .not_null()
                .unique_key(),
        )
        .col(ColumnDef::new(Users::Email).string_len(254).not_null())
        .col(
            ColumnDef::new(Users::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .to_owned()
}

fn posts_table() -> TableCreateStatement {
    Table::create()
        .table(Posts::Table)
        .if_not_exists()
        .col(ColumnDef::new(Posts::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(Posts::Title).string_len(250).not_null())
        .col(ColumnDef::new(Posts::Slug).string_len(250).not_null())
        .col(ColumnDef::new(Posts::AuthorId).uuid().not_null())
        .col(ColumnDef::new(Posts::Body).text().not_null())
        .col(
            ColumnDef::new(Posts::Publish)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(ColumnDef::new(Posts::PublishDay).date().not_null())
        .col(
            ColumnDef::new(Posts::Created)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Posts::Updated)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Posts::Status)
                .string_len(10)
                .not_null()
                .default("draft"),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_posts_author")
                .from(Posts::Table, Posts::AuthorId)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn posts_day_slug_index() -> IndexCreateStatement {
    Index::create()
        .name("uq_posts_publish_day_slug")
        .table(Posts::Table)
        .col(Posts::PublishDay)
        .col(Posts::Slug)
        .unique()
        .to_owned()
}

fn comments_table() -> TableCreateStatement {
    Table::create()
        .table(Comments::Table)
        .if_not_exists()
        .col(ColumnDef::new(Comments::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(Comments::PostId).uuid().not_null())
        .col(ColumnDef::new(Comments::Name).string_len(80).not_null())
        .col(ColumnDef::new(Comments::Email).string_len(254).not_null())
        .col(ColumnDef::new(Comments::Body).text().not_null())
        .col(
            ColumnDef::new(Comments::Created)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Comments::Updated)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Comments::Active)
                .boolean()
                .not_null()
                .default(true),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_comments_post")
                .from(Comments::Table, Comments::PostId)
                .to(Posts::Table, Posts::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn tags_table() -> TableCreateStatement {
    Table::create()
        .table(Tags::Table)
        .if_not_exists()
        .col(ColumnDef::new(Tags::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(Tags::Name).string_len(100).not_null())
        .col(
            ColumnDef::new(Tags::Slug)
                .string_len(100)
                .not_null()
                .unique_key(),
        )
        .to_owned()
}

fn post_tags_table() -> TableCreateStatement {
    Table::create()
        .table(PostTags::Table)
        .if_not_exists()
        .col(ColumnDef::new(PostTags::PostId).uuid().not_null())
        .col(ColumnDef::new(PostTags::TagId).uuid().not_null())
        .primary_key(Index::create().col(PostTags::PostId).col(PostTags::TagId))
        .foreign_key(
            ForeignKey::create()
                .name("fk_post_tags_post")
                .from(PostTags::Table, PostTags::PostId)
                .to(Posts::Table, Posts::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_post_tags_tag")
                .from(PostTags::Table, PostTags::TagId)
                .to(Tags::Table, Tags::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    Title,
    Slug,
    AuthorId,
    Body,
    Publish,
    PublishDay,
    Created,
    Updated,
    Status,
}

#[derive(DeriveIden)]
enum Comments {
    Table,
    Id,
    PostId,
    Name,
    Email,
    Body,
    Created,
    Updated,
    Active,
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
    Name,
    Slug,
}

#[derive(DeriveIden)]
enum PostTags {
    Table,
    PostId,
    TagId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posts_cascade_from_users() {
        let sql = posts_table().to_string(PostgresQueryBuilder);
        assert!(sql.contains("\"fk_posts_author\""));
        assert!(sql.contains("REFERENCES \"users\""));
        assert!(sql.contains("ON DELETE CASCADE"));
    }

    #[test]
    fn comments_cascade_from_posts() {
        let sql = comments_table().to_string(PostgresQueryBuilder);
        assert!(sql.contains("REFERENCES \"posts\""));
        assert!(sql.contains("ON DELETE CASCADE"));
    }

    #[test]
    fn slug_is_unique_per_publish_day() {
        let sql = posts_day_slug_index().to_string(PostgresQueryBuilder);
        assert!(sql.starts_with("CREATE UNIQUE INDEX"));
        assert!(sql.contains("\"publish_day\", \"slug\""));
    }
}

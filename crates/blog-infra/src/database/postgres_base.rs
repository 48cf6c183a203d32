use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DbConn, DbErr, EntityTrait, IntoActiveModel,
    PrimaryKeyTrait, SqlErr,
};
use uuid::Uuid;

use blog_core::domain::{Comment, Post, User};
use blog_core::error::RepoError;
use blog_core::ports::BaseRepository;

/// Domain types persisted through [`PostgresBaseRepository`].
pub trait Identified<ID> {
    fn id(&self) -> ID;
}

impl Identified<Uuid> for User {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Identified<Uuid> for Post {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Identified<Uuid> for Comment {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Translate a SeaORM error. Unique violations become
/// [`RepoError::Constraint`], dangling references [`RepoError::ForeignKey`].
pub(crate) fn map_db_err(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => RepoError::Constraint(detail),
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => RepoError::ForeignKey(detail),
        _ => match err {
            DbErr::Conn(e) => RepoError::Connection(e.to_string()),
            DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
            DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepoError::NotFound,
            other => RepoError::Query(other.to_string()),
        },
    }
}

/// Generic PostgreSQL repository implementation. Repositories built over
/// the same pool share one connection handle.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: Arc<DbConn>,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: Arc<DbConn>) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    pub(crate) fn db(&self) -> &DbConn {
        &self.db
    }
}

#[async_trait]
impl<E, T, ID> BaseRepository<T, ID> for PostgresBaseRepository<E>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync + Send,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = ID>,
    ID: Send + Sync + Into<sea_orm::Value> + Clone + Copy + 'static,
    T: Identified<ID> + From<E::Model> + Into<E::ActiveModel> + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError> {
        let result = E::find_by_id(id).one(self.db()).await.map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn save(&self, entity: T) -> Result<T, RepoError> {
        // Insert vs update decides which before_save rules apply.
        let exists = E::find_by_id(entity.id())
            .one(self.db())
            .await
            .map_err(map_db_err)?
            .is_some();

        let active_model: E::ActiveModel = entity.into();
        let model = if exists {
            active_model.update(self.db()).await
        } else {
            active_model.insert(self.db()).await
        }
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn delete(&self, id: ID) -> Result<(), RepoError> {
        let result = E::delete_by_id(id)
            .exec(self.db())
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

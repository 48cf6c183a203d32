//! Backend selection - PostgreSQL when configured and reachable, memory otherwise.

use std::sync::Arc;

use blog_core::BlogService;
use blog_core::ports::{CommentRepository, PostRepository, UserRepository};

use crate::database::DatabaseConfig;
use crate::memory::InMemoryStore;

#[cfg(feature = "postgres")]
use crate::database::{
    DatabaseConnections, PostgresCommentRepository, PostgresPostRepository,
    PostgresUserRepository,
};

/// Which storage the repositories ended up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    InMemory,
}

/// The three repositories sharing one backend.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub backend: Backend,
}

impl Repositories {
    /// Repositories over a fresh in-memory store.
    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        Self {
            users: Arc::new(store.users()),
            posts: Arc::new(store.posts()),
            comments: Arc::new(store.comments()),
            backend: Backend::InMemory,
        }
    }

    /// Connect to PostgreSQL if `db_config` is given, falling back to memory
    /// when it is absent or the connection fails.
    pub async fn init(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        {
            if let Some(config) = db_config {
                match DatabaseConnections::init(config).await {
                    Ok(connections) => {
                        let db = Arc::new(connections.main);
                        tracing::info!("Repositories backed by PostgreSQL");
                        return Self {
                            users: Arc::new(PostgresUserRepository::new(Arc::clone(&db))),
                            posts: Arc::new(PostgresPostRepository::new(Arc::clone(&db))),
                            comments: Arc::new(PostgresCommentRepository::new(db)),
                            backend: Backend::Postgres,
                        };
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "postgres"))]
        {
            let _ = db_config;
            tracing::info!("Running without postgres feature - using in-memory repositories");
        }

        Self::in_memory()
    }

    pub fn service(&self) -> BlogService {
        BlogService::new(
            self.users.clone(),
            self.posts.clone(),
            self.comments.clone(),
        )
    }
}

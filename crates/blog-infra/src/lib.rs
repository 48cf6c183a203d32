//! # Blog Infrastructure
//!
//! Concrete implementations of the repository ports defined in `blog-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL storage via SeaORM

pub mod database;
pub mod memory;
pub mod repositories;

pub use database::{ConfigError, DatabaseConfig};
pub use memory::InMemoryStore;
pub use repositories::{Backend, Repositories};

#[cfg(feature = "postgres")]
pub use database::DatabaseConnections;

//! In-memory storage backend - fallback when PostgreSQL is unavailable.

mod store;

pub use store::{
    InMemoryCommentRepository, InMemoryPostRepository, InMemoryStore, InMemoryUserRepository,
};

#[cfg(test)]
mod tests;

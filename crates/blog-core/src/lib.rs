//! # Blog Core
//!
//! The domain layer of the blog: posts, comments, tags and the repository
//! ports the storage backends implement.
//! This crate has no database dependency; see `blog-infra` for the backends.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::{DomainError, RepoError};
pub use service::BlogService;

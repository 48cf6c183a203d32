//! SeaORM entities mirroring the tables created by the `migration` app.

pub mod comment;
pub mod post;
pub mod post_tag;
pub mod tag;
pub mod user;

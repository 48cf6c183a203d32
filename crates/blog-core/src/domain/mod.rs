//! Domain entities - the core business objects.

mod comment;
mod post;
mod route;
mod slug;
mod tag;
mod user;

pub use comment::{Comment, CommentOnPost};
pub use post::{Post, PostStatus, published_only};
pub use route::{POST_DETAIL_PREFIX, PostDetailRoute};
pub use slug::{is_valid_slug, slugify, slugify_unicode};
pub use tag::{TAG_NAME_MAX_LEN, Tag, normalize_tag_names, validate_tag_names};
pub use user::User;

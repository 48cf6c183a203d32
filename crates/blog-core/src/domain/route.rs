//! Post detail paths: `/blog/{year}/{month}/{day}/{slug}/`.

use std::fmt;

use chrono::{Datelike, NaiveDate};

use super::post::Post;
use super::slug::is_valid_slug;

/// Mount point of the blog's post detail pages.
pub const POST_DETAIL_PREFIX: &str = "/blog";

/// The arguments the router needs to resolve a single post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDetailRoute {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub slug: String,
}

impl PostDetailRoute {
    pub fn for_post(post: &Post) -> Self {
        let day = post.publish_day();
        Self {
            year: day.year(),
            month: day.month(),
            day: day.day(),
            slug: post.slug.clone(),
        }
    }

    /// The calendar day, or `None` for an impossible date such as 2023/2/30.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// Parse a path produced by [`fmt::Display`]. The trailing slash is optional.
    pub fn parse(path: &str) -> Option<Self> {
        let rest = path.strip_prefix(POST_DETAIL_PREFIX)?;
        let mut parts = rest.trim_matches('/').split('/');

        let year = number(parts.next()?)?;
        let month = number(parts.next()?)?;
        let day = number(parts.next()?)?;
        let slug = parts.next()?;

        if parts.next().is_some() || !is_valid_slug(slug) {
            return None;
        }

        Some(Self {
            year,
            month,
            day,
            slug: slug.to_string(),
        })
    }
}

// Plain decimal digits only; `str::parse` would also take "+3".
fn number<T: std::str::FromStr>(segment: &str) -> Option<T> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

impl fmt::Display for PostDetailRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}/{}/",
            POST_DETAIL_PREFIX, self.year, self.month, self.day, self.slug
        )
    }
}

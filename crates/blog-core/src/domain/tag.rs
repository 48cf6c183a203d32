use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slug::slugify_unicode;
use crate::error::DomainError;

/// Longest tag name (and slug) the `tags` table stores.
pub const TAG_NAME_MAX_LEN: usize = 100;

/// Tag entity - a label shared between posts, unique by slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl Tag {
    pub fn new(name: &str) -> Self {
        let name = name.trim();
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slugify_unicode(name),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Reject tag names that would produce an empty slug or not fit the
/// `tags` table.
pub fn validate_tag_names<S: AsRef<str>>(names: &[S]) -> Result<(), DomainError> {
    for name in names {
        let name = name.as_ref().trim();
        let slug = slugify_unicode(name);
        if slug.is_empty() {
            return Err(DomainError::Validation(format!(
                "tag '{}' has no letters or digits",
                name
            )));
        }
        if name.chars().count() > TAG_NAME_MAX_LEN || slug.chars().count() > TAG_NAME_MAX_LEN {
            return Err(DomainError::Validation(format!(
                "tag names are limited to {} characters",
                TAG_NAME_MAX_LEN
            )));
        }
    }
    Ok(())
}

/// Trim, drop names without a usable slug and deduplicate by slug
/// (first spelling wins).
pub fn normalize_tag_names<S: AsRef<str>>(names: &[S]) -> Vec<(String, String)> {
    let mut seen = Vec::<(String, String)>::new();
    for name in names {
        let name = name.as_ref().trim();
        let slug = slugify_unicode(name);
        if slug.is_empty() || seen.iter().any(|(_, s)| *s == slug) {
            continue;
        }
        seen.push((name.to_string(), slug));
    }
    seen
}

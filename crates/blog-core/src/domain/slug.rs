//! URL-safe identifiers.

/// True when `value` is non-empty and made only of ASCII letters, digits,
/// underscores and hyphens.
pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Lowercase `value`, collapse whitespace and hyphen runs into single
/// hyphens, drop every other character, and strip leading/trailing `-`/`_`.
/// Only ASCII letters and digits survive.
pub fn slugify(value: &str) -> String {
    slugify_with(value, |ch| ch.is_ascii_alphanumeric())
}

/// Like [`slugify`], but keeps letters and digits from any script.
pub fn slugify_unicode(value: &str) -> String {
    slugify_with(value, char::is_alphanumeric)
}

fn slugify_with(value: &str, keep: impl Fn(char) -> bool) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;

    for ch in value.chars() {
        if keep(ch) || ch == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else if ch == '-' || ch.is_whitespace() {
            pending_dash = true;
        }
    }

    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_slug_charset() {
        assert!(is_valid_slug("hello-world_2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("hello world"));
        assert!(!is_valid_slug("héllo"));
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Hello,  World!"), "hello-world");
        assert_eq!(slugify("  --Rust -- is fun-- "), "rust-is-fun");
        assert_eq!(slugify("_private_"), "private");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("日本語"), "");
    }

    #[test]
    fn unicode_slugify_keeps_other_scripts() {
        assert_eq!(slugify_unicode("日本語"), "日本語");
        assert_eq!(slugify_unicode("Ελληνικά Νέα"), "ελληνικά-νέα");
        assert_eq!(slugify_unicode("Hello,  World!"), "hello-world");
        assert_eq!(slugify_unicode("???"), "");
    }
}

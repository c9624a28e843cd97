//! URL-safe slug derivation for courses and lessons.

use uuid::Uuid;

/// Lowercase a title and collapse everything that is not alphanumeric
/// into single hyphens.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true; // suppress a leading hyphen

    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        slug.push_str("untitled");
    }

    slug
}

/// Derive a globally unique slug from a title by appending a short random
/// suffix. Identical titles always produce distinct slugs.
pub fn unique_slug(title: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", slugify(title), &suffix[..8])
}

//! Cache key generation utilities
//!
//! Keys are plain strings so they stay readable in `redis-cli`. List keys share
//! [`LIST_KEY_PREFIX`], which is what list invalidation enumerates.

/// Prefix shared by every cached list page
pub const LIST_KEY_PREFIX: &str = "blog:list:";

/// Prefix shared by every cached blog post
pub const POST_KEY_PREFIX: &str = "blog:post:";

/// Split a comma separated `tags` query value into a normalized tag set.
///
/// Each tag is trimmed and lower-cased; empty entries are dropped. The result is
/// sorted and deduplicated, so it can be used both for the key and for the
/// store filter.
pub fn parse_tags(raw: &str) -> Vec<String> {
    normalize_tags(raw.split(','))
}

/// Normalize an arbitrary tag sequence the same way [`parse_tags`] does.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = tags
        .into_iter()
        .map(|tag| tag.as_ref().trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect();
    normalized.sort();
    normalized.dedup();
    normalized
}

/// Generate cache key for a blog list page.
///
/// `page` and `limit` are embedded exactly as the client sent them, so `"1"` and
/// `"01"` are separate entries even though they query the same page.
pub fn derive_list_key<S: AsRef<str>>(page: &str, limit: &str, tags: &[S]) -> String {
    let tags = normalize_tags(tags);
    let mut key = format!("{}page:{}:limit:{}", LIST_KEY_PREFIX, page, limit);
    if !tags.is_empty() {
        key.push_str(":tags:");
        key.push_str(&tags.join(","));
    }
    key
}

/// Generate cache key for a single blog post
pub fn derive_entity_key(blog_id: &str) -> String {
    format!("{}{}", POST_KEY_PREFIX, blog_id)
}

// Utils module for utility functions
use chrono::{DateTime, SubsecRound, Utc};
use lazy_static::lazy_static;
use rand::{distributions::Alphanumeric, Rng};
use regex::Regex;

const BLOG_ID_LENGTH: usize = 8;

lazy_static! {
    static ref NON_SLUG_CHARS: Regex = Regex::new(r"[^a-z0-9-]").unwrap();
    static ref REPEATED_HYPHENS: Regex = Regex::new(r"-+").unwrap();
}

/// Build a URL slug from a title: lowercase, spaces to hyphens, drop anything
/// outside `[a-z0-9-]`, collapse hyphen runs and trim hyphens at both ends.
pub fn generate_slug(title: &str) -> String {
    let slug = title.to_lowercase().replace(' ', "-");
    let slug = NON_SLUG_CHARS.replace_all(&slug, "");
    let slug = REPEATED_HYPHENS.replace_all(&slug, "-");
    slug.trim_matches('-').to_string()
}

/// Random 8 character alphanumeric blog id
pub fn generate_blog_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(BLOG_ID_LENGTH)
        .map(char::from)
        .collect()
}

/// Current time at the precision Postgres stores, so cached and stored copies compare equal.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

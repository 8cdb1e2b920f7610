//! Centralized TTL constants for caching
//!
//! This module provides consistent cache time-to-live values
//! across the application with environment variable overrides.

use std::env;
use std::time::Duration;

// Default TTL constants (in seconds)
pub const TTL_BLOG_POST: u64 = 7 * 24 * 60 * 60; // 7 days
pub const TTL_BLOG_LIST: u64 = 7 * 24 * 60 * 60; // 7 days

/// Get TTL with environment variable override
pub fn ttl_with_env(env_key: &str, default_ttl: u64) -> u64 {
    env::var(env_key)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .filter(|ttl| *ttl > 0)
        .unwrap_or(default_ttl)
}

/// Get blog post TTL from environment or default
pub fn get_blog_post_ttl() -> u64 {
    ttl_with_env("TTL_BLOG_POST_SECONDS", TTL_BLOG_POST)
}

/// Get blog list TTL from environment or default
pub fn get_blog_list_ttl() -> u64 {
    ttl_with_env("TTL_BLOG_LIST_SECONDS", TTL_BLOG_LIST)
}

/// TTLs applied by the blog cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtl {
    pub post: Duration,
    pub list: Duration,
}

impl CacheTtl {
    pub fn from_env() -> Self {
        Self {
            post: Duration::from_secs(get_blog_post_ttl()),
            list: Duration::from_secs(get_blog_list_ttl()),
        }
    }
}

impl Default for CacheTtl {
    fn default() -> Self {
        Self {
            post: Duration::from_secs(TTL_BLOG_POST),
            list: Duration::from_secs(TTL_BLOG_LIST),
        }
    }
}

//! Blog post models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::db::StoreError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// A blog post as stored and as cached under `blog:post:<blog_id>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Blog {
    pub blog_id: String,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub tags: Vec<String>,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of create and update requests.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BlogDraft {
    #[serde(default)]
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "at least one tag is required"))]
    pub tags: Vec<String>,
}

impl BlogDraft {
    /// Tags trimmed, with blanks removed. Case and order are kept.
    pub fn cleaned_tags(&self) -> Vec<String> {
        self.tags
            .iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Raw query string of the list endpoint. Values are kept as text because the
/// cache key embeds them verbatim.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListBlogsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub tags: Option<String>,
}

impl ListBlogsQuery {
    pub fn new(page: &str, limit: &str, tags: &str) -> Self {
        Self {
            page: Some(page.to_string()),
            limit: Some(limit.to_string()),
            tags: Some(tags.to_string()),
        }
    }

    /// Page text as used in the cache key; empty or missing means `"1"`.
    pub fn page_text(&self) -> &str {
        non_empty_or(self.page.as_deref(), "1")
    }

    /// Limit text as used in the cache key; empty or missing means `"10"`.
    pub fn limit_text(&self) -> &str {
        non_empty_or(self.limit.as_deref(), "10")
    }

    pub fn tags_text(&self) -> &str {
        self.tags.as_deref().unwrap_or("")
    }

    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: parse_positive(self.page_text()).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(self.limit_text()).unwrap_or(DEFAULT_LIMIT),
        }
    }
}

fn non_empty_or<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => default,
    }
}

fn parse_positive(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok().filter(|n| *n >= 1)
}

/// Parsed page window. Both fields are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn skip(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total_items: i64) -> i64 {
        // (total + limit - 1) / limit, without overflowing on huge limits
        if total_items <= 0 {
            0
        } else {
            (total_items - 1) / self.limit + 1
        }
    }
}

/// One page of the blog list, as returned to clients and cached under a list key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPage {
    pub blogs: Vec<Blog>,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub total_item: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum BlogError {
    #[error("{0}")]
    Validation(String),

    #[error("Blog not found")]
    NotFound,

    #[error("User is not the author of this blog")]
    Forbidden,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for BlogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { field } => {
                BlogError::Conflict(format!("a blog with this {} already exists", field))
            }
            other => BlogError::Store(other),
        }
    }
}

// ============================================================================
// BLOG SERVICE - cache-aside reads, write-through + list invalidation on writes
// ============================================================================

use std::sync::Arc;
use tracing::{debug, error, info, warn};
use validator::Validate;

use super::models::{Blog, BlogDraft, BlogError, BlogPage, ListBlogsQuery};
use super::repository::BlogRepository;
use crate::cache::{
    CacheClient, CacheLookup, InvalidationOutcome, InvalidationStrategy, PrefixInvalidation,
};
use crate::cache_key::{derive_entity_key, derive_list_key, parse_tags};
use crate::cache_ttl::CacheTtl;
use crate::utils::{generate_blog_id, generate_slug, now_utc};

pub const MISSING_FIELDS: &str = "Missing required fields.";
pub const MISSING_BLOG_ID: &str = "Missing blog id.";

/// Coordinates the blog store and its cache.
///
/// The store is the system of record. Cache reads and writes are best-effort:
/// a degraded cache turns into store reads and skipped writes, never an error.
#[derive(Clone)]
pub struct BlogService {
    repo: Arc<dyn BlogRepository>,
    cache: CacheClient,
    invalidation: Arc<dyn InvalidationStrategy>,
    ttl: CacheTtl,
}

impl BlogService {
    pub fn new(repo: Arc<dyn BlogRepository>, cache: CacheClient, ttl: CacheTtl) -> Self {
        Self {
            repo,
            cache,
            invalidation: Arc::new(PrefixInvalidation::default()),
            ttl,
        }
    }

    pub fn with_invalidation(mut self, invalidation: Arc<dyn InvalidationStrategy>) -> Self {
        self.invalidation = invalidation;
        self
    }

    pub fn cache(&self) -> &CacheClient {
        &self.cache
    }

    /// One page of posts, optionally filtered by any of the given tags.
    pub async fn list_blogs(&self, query: &ListBlogsQuery) -> Result<BlogPage, BlogError> {
        let pagination = query.pagination();
        let tags = parse_tags(query.tags_text());
        let key = derive_list_key(query.page_text(), query.limit_text(), &tags);

        if let CacheLookup::Hit(page) = self.cache.lookup::<BlogPage>(&key).await {
            return Ok(page);
        }

        let filter = if tags.is_empty() { None } else { Some(tags.as_slice()) };
        let (total_item, blogs) = futures::try_join!(
            self.repo.count_matching(filter),
            self.repo
                .find_page(filter, pagination.skip(), pagination.limit),
        )
        .map_err(|e| {
            error!(key = %key, error = %e, "Failed to load blog list");
            BlogError::from(e)
        })?;

        let page = BlogPage {
            blogs,
            page: pagination.page,
            limit: pagination.limit,
            total_pages: pagination.total_pages(total_item),
            total_item,
        };

        self.cache.write_through(&key, &page, self.ttl.list).await;
        Ok(page)
    }

    pub async fn get_blog(&self, blog_id: &str) -> Result<Blog, BlogError> {
        if blog_id.is_empty() {
            return Err(BlogError::Validation(MISSING_BLOG_ID.to_string()));
        }

        let key = derive_entity_key(blog_id);
        if let CacheLookup::Hit(blog) = self.cache.lookup::<Blog>(&key).await {
            return Ok(blog);
        }

        let blog = self
            .repo
            .find_by_id(blog_id)
            .await
            .map_err(|e| {
                error!(blog_id = %blog_id, error = %e, "Failed to load blog");
                BlogError::from(e)
            })?
            .ok_or(BlogError::NotFound)?;

        self.cache.write_through(&key, &blog, self.ttl.post).await;
        Ok(blog)
    }

    pub async fn create_blog(&self, author_id: &str, draft: BlogDraft) -> Result<Blog, BlogError> {
        validate_draft(author_id, &draft)?;

        let now = now_utc();
        let blog = Blog {
            blog_id: generate_blog_id(),
            slug: generate_slug(&draft.title),
            tags: draft.cleaned_tags(),
            title: draft.title,
            content: draft.content,
            author_id: author_id.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.repo.insert(&blog).await.map_err(|e| {
            error!(blog_id = %blog.blog_id, error = %e, "Failed to insert blog");
            BlogError::from(e)
        })?;

        self.cache
            .write_through(&derive_entity_key(&blog.blog_id), &blog, self.ttl.post)
            .await;
        self.invalidate_list_caches().await;

        info!(blog_id = %blog.blog_id, author_id = %author_id, "Blog created");
        Ok(blog)
    }

    pub async fn update_blog(
        &self,
        author_id: &str,
        blog_id: &str,
        draft: BlogDraft,
    ) -> Result<Blog, BlogError> {
        if blog_id.is_empty() {
            return Err(BlogError::Validation(MISSING_BLOG_ID.to_string()));
        }
        validate_draft(author_id, &draft)?;

        let existing = self.find_owned(author_id, blog_id).await?;

        let updated = Blog {
            blog_id: existing.blog_id,
            slug: generate_slug(&draft.title),
            tags: draft.cleaned_tags(),
            title: draft.title,
            content: draft.content,
            author_id: existing.author_id,
            created_at: existing.created_at,
            updated_at: now_utc(),
        };

        let replaced = self.repo.replace_by_id(blog_id, &updated).await.map_err(|e| {
            error!(blog_id = %blog_id, error = %e, "Failed to update blog");
            BlogError::from(e)
        })?;
        if !replaced {
            warn!(blog_id = %blog_id, "Blog disappeared before update");
            return Err(BlogError::NotFound);
        }

        self.cache
            .write_through(&derive_entity_key(blog_id), &updated, self.ttl.post)
            .await;
        self.invalidate_list_caches().await;

        info!(blog_id = %blog_id, "Blog updated");
        Ok(updated)
    }

    pub async fn delete_blog(&self, author_id: &str, blog_id: &str) -> Result<(), BlogError> {
        if blog_id.is_empty() {
            return Err(BlogError::Validation(MISSING_BLOG_ID.to_string()));
        }
        if author_id.is_empty() {
            return Err(BlogError::Validation(MISSING_FIELDS.to_string()));
        }

        self.find_owned(author_id, blog_id).await?;

        let deleted = self.repo.delete_by_id(blog_id).await.map_err(|e| {
            error!(blog_id = %blog_id, error = %e, "Failed to delete blog");
            BlogError::from(e)
        })?;
        if !deleted {
            debug!(blog_id = %blog_id, "Blog already gone at delete time");
        }

        // evict() logs at error level on failure
        self.cache.evict(&derive_entity_key(blog_id)).await;
        self.invalidate_list_caches().await;

        info!(blog_id = %blog_id, "Blog deleted");
        Ok(())
    }

    pub async fn invalidate_list_caches(&self) -> InvalidationOutcome {
        self.invalidation.invalidate_lists(self.cache.store()).await
    }

    /// Load from the store, bypassing the cache, and check ownership.
    async fn find_owned(&self, author_id: &str, blog_id: &str) -> Result<Blog, BlogError> {
        let blog = self
            .repo
            .find_by_id(blog_id)
            .await
            .map_err(|e| {
                error!(blog_id = %blog_id, error = %e, "Failed to find blog");
                BlogError::from(e)
            })?
            .ok_or(BlogError::NotFound)?;

        if blog.author_id != author_id {
            warn!(blog_id = %blog_id, author_id = %author_id, "Rejected write by non-author");
            return Err(BlogError::Forbidden);
        }

        Ok(blog)
    }
}

fn validate_draft(author_id: &str, draft: &BlogDraft) -> Result<(), BlogError> {
    if author_id.is_empty() {
        return Err(BlogError::Validation(MISSING_FIELDS.to_string()));
    }
    if let Err(errors) = draft.validate() {
        debug!(errors = %errors, "Blog draft rejected");
        return Err(BlogError::Validation(MISSING_FIELDS.to_string()));
    }
    if draft.cleaned_tags().is_empty() {
        return Err(BlogError::Validation(MISSING_FIELDS.to_string()));
    }
    Ok(())
}

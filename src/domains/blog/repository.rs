use async_trait::async_trait;
use sqlx::PgPool;
use std::time::Duration;

use super::models::Blog;
use crate::db::{with_deadline, StoreError};

/// System of record for blog posts.
///
/// `tags` filters are any-of and are expected to be normalized (trimmed and
/// lower-cased, see `cache_key::normalize_tags`); stored tags are compared
/// case-insensitively. `None` means no filter.
#[async_trait]
pub trait BlogRepository: Send + Sync {
    async fn count_matching(&self, tags: Option<&[String]>) -> Result<i64, StoreError>;

    async fn find_page(
        &self,
        tags: Option<&[String]>,
        skip: i64,
        take: i64,
    ) -> Result<Vec<Blog>, StoreError>;

    async fn find_by_id(&self, blog_id: &str) -> Result<Option<Blog>, StoreError>;

    async fn insert(&self, blog: &Blog) -> Result<(), StoreError>;

    /// Returns `false` when no row has that id.
    async fn replace_by_id(&self, blog_id: &str, blog: &Blog) -> Result<bool, StoreError>;

    /// Returns `false` when no row has that id.
    async fn delete_by_id(&self, blog_id: &str) -> Result<bool, StoreError>;
}

const TAG_FILTER: &str = "($1::text[] IS NULL OR EXISTS (\
     SELECT 1 FROM unnest(tags) AS t(tag) WHERE lower(t.tag) = ANY($1)))";

/// Postgres implementation on the shared pool
#[derive(Clone)]
pub struct PgBlogRepository {
    db: PgPool,
    query_timeout: Duration,
}

impl PgBlogRepository {
    pub fn new(db: PgPool, query_timeout: Duration) -> Self {
        Self { db, query_timeout }
    }
}

#[async_trait]
impl BlogRepository for PgBlogRepository {
    async fn count_matching(&self, tags: Option<&[String]>) -> Result<i64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM blogs WHERE {}", TAG_FILTER);
        let filter = tags.map(<[String]>::to_vec);

        with_deadline(
            self.query_timeout,
            "count_matching",
            sqlx::query_scalar::<_, i64>(&sql).bind(filter).fetch_one(&self.db),
        )
        .await
    }

    async fn find_page(
        &self,
        tags: Option<&[String]>,
        skip: i64,
        take: i64,
    ) -> Result<Vec<Blog>, StoreError> {
        // No ORDER BY: rows come back in whatever order Postgres scans them.
        let sql = format!(
            r#"
            SELECT blog_id, title, content, slug, tags, author_id, created_at, updated_at
            FROM blogs
            WHERE {}
            OFFSET $2 LIMIT $3
            "#,
            TAG_FILTER
        );
        let filter = tags.map(<[String]>::to_vec);

        with_deadline(
            self.query_timeout,
            "find_page",
            sqlx::query_as::<_, Blog>(&sql)
                .bind(filter)
                .bind(skip)
                .bind(take)
                .fetch_all(&self.db),
        )
        .await
    }

    async fn find_by_id(&self, blog_id: &str) -> Result<Option<Blog>, StoreError> {
        with_deadline(
            self.query_timeout,
            "find_by_id",
            sqlx::query_as::<_, Blog>(
                r#"
                SELECT blog_id, title, content, slug, tags, author_id, created_at, updated_at
                FROM blogs
                WHERE blog_id = $1
                "#,
            )
            .bind(blog_id)
            .fetch_optional(&self.db),
        )
        .await
    }

    async fn insert(&self, blog: &Blog) -> Result<(), StoreError> {
        let query = sqlx::query(
            r#"
            INSERT INTO blogs (blog_id, title, content, slug, tags, author_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&blog.blog_id)
        .bind(&blog.title)
        .bind(&blog.content)
        .bind(&blog.slug)
        .bind(&blog.tags)
        .bind(&blog.author_id)
        .bind(blog.created_at)
        .bind(blog.updated_at);

        match tokio::time::timeout(self.query_timeout, query.execute(&self.db)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(StoreError::from_insert(e, "blog_id")),
            Err(_) => Err(StoreError::Timeout { operation: "insert" }),
        }
    }

    async fn replace_by_id(&self, blog_id: &str, blog: &Blog) -> Result<bool, StoreError> {
        let result = with_deadline(
            self.query_timeout,
            "replace_by_id",
            sqlx::query(
                r#"
                UPDATE blogs
                SET title = $2, content = $3, slug = $4, tags = $5,
                    author_id = $6, created_at = $7, updated_at = $8
                WHERE blog_id = $1
                "#,
            )
            .bind(blog_id)
            .bind(&blog.title)
            .bind(&blog.content)
            .bind(&blog.slug)
            .bind(&blog.tags)
            .bind(&blog.author_id)
            .bind(blog.created_at)
            .bind(blog.updated_at)
            .execute(&self.db),
        )
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_id(&self, blog_id: &str) -> Result<bool, StoreError> {
        let result = with_deadline(
            self.query_timeout,
            "delete_by_id",
            sqlx::query("DELETE FROM blogs WHERE blog_id = $1")
                .bind(blog_id)
                .execute(&self.db),
        )
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

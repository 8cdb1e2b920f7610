#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use blog_rust_ws::cache::{CacheClient, MemoryCacheStore};
use blog_rust_ws::cache_ttl::CacheTtl;
use blog_rust_ws::db::StoreError;
use blog_rust_ws::domains::blog::{Blog, BlogRepository, BlogService};
use blog_rust_ws::domains::users::{User, UserRepository};

/// In-memory blog store with failure switches and a call counter.
#[derive(Default)]
pub struct FakeBlogRepository {
    rows: Mutex<Vec<Blog>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    force_duplicate: AtomicBool,
    calls: AtomicUsize,
}

impl FakeBlogRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed(&self, blog: Blog) {
        self.rows.lock().unwrap().push(blog);
    }

    pub fn row(&self, blog_id: &str) -> Option<Blog> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.blog_id == blog_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Every insert reports a unique-key collision.
    pub fn set_force_duplicate(&self, force: bool) {
        self.force_duplicate.store(force, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn read(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Timeout { operation: "read" });
        }
        Ok(())
    }

    fn write(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Timeout { operation: "write" });
        }
        Ok(())
    }

    fn matching(&self, tags: Option<&[String]>) -> Vec<Blog> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|b| match tags {
                None => true,
                Some(wanted) => b.tags.iter().any(|t| wanted.contains(&t.to_lowercase())),
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl BlogRepository for FakeBlogRepository {
    async fn count_matching(&self, tags: Option<&[String]>) -> Result<i64, StoreError> {
        self.read()?;
        Ok(self.matching(tags).len() as i64)
    }

    async fn find_page(
        &self,
        tags: Option<&[String]>,
        skip: i64,
        take: i64,
    ) -> Result<Vec<Blog>, StoreError> {
        self.read()?;
        Ok(self
            .matching(tags)
            .into_iter()
            .skip(skip as usize)
            .take(take as usize)
            .collect())
    }

    async fn find_by_id(&self, blog_id: &str) -> Result<Option<Blog>, StoreError> {
        self.read()?;
        Ok(self.row(blog_id))
    }

    async fn insert(&self, blog: &Blog) -> Result<(), StoreError> {
        self.write()?;
        let mut rows = self.rows.lock().unwrap();
        if self.force_duplicate.load(Ordering::SeqCst)
            || rows.iter().any(|b| b.blog_id == blog.blog_id)
        {
            return Err(StoreError::Duplicate { field: "blog_id" });
        }
        rows.push(blog.clone());
        Ok(())
    }

    async fn replace_by_id(&self, blog_id: &str, blog: &Blog) -> Result<bool, StoreError> {
        self.write()?;
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|b| b.blog_id == blog_id) {
            Some(row) => {
                *row = blog.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, blog_id: &str) -> Result<bool, StoreError> {
        self.write()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|b| b.blog_id != blog_id);
        Ok(rows.len() < before)
    }
}

#[derive(Default)]
pub struct FakeUserRepository {
    rows: Mutex<Vec<User>>,
}

impl FakeUserRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed(&self, user: User) {
        self.rows.lock().unwrap().push(user);
    }
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate { field: "email" });
        }
        rows.push(user.clone());
        Ok(())
    }
}

/// Blog service over fakes, returning handles to the fakes.
pub fn blog_service() -> (BlogService, Arc<FakeBlogRepository>, Arc<MemoryCacheStore>) {
    let repo = FakeBlogRepository::new();
    let store = Arc::new(MemoryCacheStore::new());
    let service = BlogService::new(repo.clone(), CacheClient::new(store.clone()), CacheTtl::default());
    (service, repo, store)
}

pub fn blog(blog_id: &str, author_id: &str, tags: &[&str]) -> Blog {
    let now = blog_rust_ws::utils::now_utc();
    Blog {
        blog_id: blog_id.to_string(),
        title: format!("Title {}", blog_id),
        content: "content".to_string(),
        slug: format!("title-{}", blog_id.to_lowercase()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        author_id: author_id.to_string(),
        created_at: now,
        updated_at: now,
    }
}

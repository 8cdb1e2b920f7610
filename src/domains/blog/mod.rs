pub mod models;
pub mod repository;
pub mod service;

pub use models::{Blog, BlogDraft, BlogError, BlogPage, ListBlogsQuery, Pagination};
pub use repository::{BlogRepository, PgBlogRepository};
pub use service::BlogService;

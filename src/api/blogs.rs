// ============================================================================
// BLOG ENDPOINTS
// ============================================================================

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use super::common::{ApiError, BlogAction, ResponseData, ResponseMsg};
use crate::domains::blog::{Blog, BlogDraft, BlogPage, ListBlogsQuery};
use crate::middleware::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreatedBlog {
    pub blog_id: String,
}

/// GET /api/v1/all_blogs?page=&limit=&tags=a,b
///
/// An unparseable query string is served as if no parameters were given.
pub async fn list_blogs(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListBlogsQuery>, QueryRejection>,
) -> Result<Json<ResponseData<BlogPage>>, ApiError> {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            debug!(error = %rejection, "Unparseable list query, using defaults");
            ListBlogsQuery::default()
        }
    };

    let page = state
        .blog_service
        .list_blogs(&query)
        .await
        .map_err(|e| ApiError::blog(e, BlogAction::List))?;

    Ok(ResponseData::new("Get all blogs successfully.", page))
}

/// GET /api/v1/blog/:blog_id
pub async fn get_blog(
    State(state): State<Arc<AppState>>,
    Path(blog_id): Path<String>,
) -> Result<Json<ResponseData<Blog>>, ApiError> {
    let blog = state
        .blog_service
        .get_blog(&blog_id)
        .await
        .map_err(|e| ApiError::blog(e, BlogAction::Get))?;

    Ok(ResponseData::new("Get blog successfully.", blog))
}

/// POST /api/v1/create_blog
pub async fn create_blog(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    body: Result<Json<BlogDraft>, JsonRejection>,
) -> Result<Json<ResponseData<CreatedBlog>>, ApiError> {
    let Json(draft) = body?;

    let blog = state
        .blog_service
        .create_blog(&user.user_id, draft)
        .await
        .map_err(|e| ApiError::blog(e, BlogAction::Create))?;

    Ok(ResponseData::new(
        "Blog created successfully.",
        CreatedBlog { blog_id: blog.blog_id },
    ))
}

/// PUT /api/v1/update_blog/:blog_id
pub async fn update_blog(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(blog_id): Path<String>,
    body: Result<Json<BlogDraft>, JsonRejection>,
) -> Result<Json<ResponseMsg>, ApiError> {
    let Json(draft) = body?;

    state
        .blog_service
        .update_blog(&user.user_id, &blog_id, draft)
        .await
        .map_err(|e| ApiError::blog(e, BlogAction::Update))?;

    Ok(ResponseMsg::new("Blog updated successfully."))
}

/// DELETE /api/v1/delete_blog/:blog_id
pub async fn delete_blog(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(blog_id): Path<String>,
) -> Result<Json<ResponseMsg>, ApiError> {
    state
        .blog_service
        .delete_blog(&user.user_id, &blog_id)
        .await
        .map_err(|e| ApiError::blog(e, BlogAction::Delete))?;

    Ok(ResponseMsg::new("Blog deleted successfully."))
}

//! Post API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{Post, PostId};
use crate::ui::{check_tags, ListQuery, VALIDATION_MESSAGE};
use crate::AppState;

/// Request body for creating or replacing a post.
#[derive(Debug, Clone, Deserialize)]
pub struct PostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PostRequest {
    /// Trimmed title, content, and tags, or a validation error.
    fn into_fields(self) -> Result<(String, String, Vec<String>), AppError> {
        let title = self.title.trim();
        let content = self.content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(AppError::Validation(VALIDATION_MESSAGE.to_string()));
        }
        Ok((
            title.to_string(),
            content.to_string(),
            check_tags(self.tags)?,
        ))
    }
}

/// GET /api/posts - List posts in creation order, optionally filtered by `?tag=`.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Post>> {
    let store = state.store.lock().await;
    if query.tag.is_empty() {
        return success(store.posts().to_vec());
    }
    let posts = store
        .filter_by_tag(&query.tag)
        .into_iter()
        .cloned()
        .collect();
    success(posts)
}

/// GET /api/posts/:id - Get a single post.
pub async fn get_post(State(state): State<AppState>, Path(id): Path<PostId>) -> ApiResult<Post> {
    let store = state.store.lock().await;
    match store.find(id) {
        Some(post) => success(post.clone()),
        None => Err(AppError::NotFound(format!("Post {} not found", id))),
    }
}

/// POST /api/posts - Create a post.
pub async fn create_post(
    State(state): State<AppState>,
    Json(request): Json<PostRequest>,
) -> ApiResult<Post> {
    let (title, content, tags) = request.into_fields()?;
    let post = state.store.lock().await.add(title, content, tags).await?;
    success(post)
}

/// PUT /api/posts/:id - Replace a post's fields. An unknown id yields `data: null`.
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<PostId>,
    Json(request): Json<PostRequest>,
) -> ApiResult<Option<Post>> {
    let (title, content, tags) = request.into_fields()?;
    let post = state
        .store
        .lock()
        .await
        .update(id, title, content, tags)
        .await?;
    success(post)
}

/// DELETE /api/posts/:id - Delete a post; deleting an unknown id is not an error.
pub async fn delete_post(State(state): State<AppState>, Path(id): Path<PostId>) -> ApiResult<()> {
    state.store.lock().await.delete(id).await?;
    success(())
}

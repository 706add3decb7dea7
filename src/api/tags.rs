//! Tag API endpoints.

use axum::extract::State;

use super::{success, ApiResult};
use crate::AppState;

/// GET /api/tags - Distinct tags in use.
pub async fn list_tags(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    let store = state.store.lock().await;
    success(store.unique_tags())
}

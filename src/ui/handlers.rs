//! HTML page handlers.
//!
//! Each handler takes the store lock for the whole operation, so actions run one at a time.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use super::form::{FormMode, PostForm};
use super::view::{render_delete_confirmation, render_page, PageModel, PostCard};
use super::{routes, PageError};
use crate::models::PostId;
use crate::AppState;

/// Query string of the list page.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Selected tag; empty shows every post
    #[serde(default)]
    pub tag: String,
}

/// GET / - Post list with an empty form, optionally filtered by tag.
pub async fn index(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Html<String> {
    let store = state.store.lock().await;
    let page = PageModel::build(
        &store,
        state.formatter.as_ref(),
        &query.tag,
        PostForm::default(),
    );
    drop(store);

    Html(render_page(&page))
}

/// POST /posts - Create a post, or update one when the form carries an edit id.
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<PostForm>,
) -> Result<Response, PageError> {
    let submission = match form.validate() {
        Ok(submission) => submission,
        Err(e) => {
            tracing::info!("Rejected post submission: {}", e);
            let store = state.store.lock().await;
            let page = PageModel::build(&store, state.formatter.as_ref(), "", form)
                .with_alert(e.message());
            drop(store);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(render_page(&page))).into_response());
        }
    };

    let mut store = state.store.lock().await;
    match submission.mode {
        FormMode::Editing(id) => {
            store
                .update(id, submission.title, submission.content, submission.tags)
                .await?;
        }
        FormMode::New => {
            store
                .add(submission.title, submission.content, submission.tags)
                .await?;
        }
    }

    Ok(Redirect::to(routes::INDEX).into_response())
}

/// GET /posts/:id/edit - The list page with the form loaded for editing.
pub async fn edit_post(State(state): State<AppState>, Path(id): Path<PostId>) -> Response {
    let store = state.store.lock().await;
    let Some(post) = store.find(id) else {
        return Redirect::to(routes::INDEX).into_response();
    };

    let form = PostForm::from_post(post);
    let page = PageModel::build(&store, state.formatter.as_ref(), "", form);
    drop(store);

    Html(render_page(&page)).into_response()
}

/// GET /posts/:id/delete - Ask before deleting.
pub async fn confirm_delete(State(state): State<AppState>, Path(id): Path<PostId>) -> Response {
    let store = state.store.lock().await;
    match store.find(id) {
        Some(post) => {
            let card = PostCard::from_post(post, state.formatter.as_ref());
            Html(render_delete_confirmation(&card)).into_response()
        }
        None => Redirect::to(routes::INDEX).into_response(),
    }
}

/// POST /posts/:id/delete - Delete after confirmation.
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<PostId>,
) -> Result<Redirect, PageError> {
    state.store.lock().await.delete(id).await?;
    Ok(Redirect::to(routes::INDEX))
}

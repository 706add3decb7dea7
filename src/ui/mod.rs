//! Presentation layer: the server-rendered page and its form actions.

mod form;
mod handlers;
pub mod routes;
mod view;

pub use form::*;
pub use handlers::*;
pub use view::*;

use axum::{
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::AppState;

/// Routes for the HTML pages, bound to the URL table in [`routes`].
pub fn router() -> Router<AppState> {
    Router::new()
        .route(routes::INDEX, get(index))
        .route(routes::SUBMIT, post(submit))
        .route(routes::EDIT, get(edit_post))
        .route(routes::DELETE, get(confirm_delete).post(delete_post))
}

/// Error rendered as an HTML page instead of a JSON envelope.
#[derive(Debug)]
pub struct PageError(pub AppError);

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        PageError(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        tracing::error!("Page request failed: {}", self.0);
        (self.0.status_code(), Html(render_error(self.0.message()))).into_response()
    }
}

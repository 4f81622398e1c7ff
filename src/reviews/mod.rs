mod delete;
mod new;

use axum::{routing::{delete, post}, Router};
use serde::Deserialize;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(new::create_review))
        .route("/{review_id}", delete(delete::delete_review))
}

/// Path parameters; `id` comes from the parent listings route.
#[derive(Deserialize)]
pub(crate) struct ReviewPath {
    id: String,
    review_id: String,
}

mod delete;
mod edit;
mod form;
mod index;
mod new;
mod show;

use axum::{routing::get, Router};

use crate::{reviews, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index::index).post(new::create_listing))
        .route("/new", get(new::render_new_form))
        .route("/{id}", get(show::show_listing).put(edit::update_listing).delete(delete::delete_listing))
        .route("/{id}/edit", get(edit::render_edit_form))
        .nest("/{id}/reviews", reviews::router())
}

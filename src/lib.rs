pub mod appresult;
pub mod auth;
pub mod config;
pub mod db;
pub mod guard;
pub mod listings;
pub mod res;
pub mod reviews;
pub mod session;
pub mod uploads;
pub mod validate;

use axum::{
    debug_handler,
    extract::{DefaultBodyLimit, FromRef, Request},
    http::Method,
    middleware, Router,
};
use sqlx::SqlitePool;
use tower::{util::{MapRequest, MapRequestLayer}, Layer};
use tower_http::{services::ServeDir, trace::TraceLayer};

pub use appresult::{AppError, AppResult};
use uploads::ImageStore;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub images: ImageStore,
}

/// The router with every route, minus the session layer, which the caller adds.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let uploads = ServeDir::new(state.images.dir());

    Router::new()
        .nest("/listings", listings::router().layer(DefaultBodyLimit::max(max_upload_bytes)))
        .merge(auth::router())
        .nest("/assets", res::router())
        .nest_service(uploads::URL_PREFIX, uploads)
        .fallback(not_found)
        .layer(middleware::from_fn(session::persist_flash))
        .layer(middleware::from_fn(session::touch))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[debug_handler]
async fn not_found() -> AppError {
    AppError::page_not_found()
}

pub type App = MapRequest<Router, fn(Request) -> Request>;

/// HTML forms only send GET and POST, so `POST ...?_method=PUT` stands in for PUT (and
/// likewise DELETE and PATCH). Has to wrap the router, since routing looks at the method.
pub fn with_method_override(router: Router) -> App {
    MapRequestLayer::new(override_method as fn(Request) -> Request).layer(router)
}

fn override_method(mut request: Request) -> Request {
    if request.method() != Method::POST {
        return request;
    }

    let requested = request
        .uri()
        .query()
        .unwrap_or_default()
        .split('&')
        .find_map(|pair| pair.strip_prefix("_method="))
        .map(str::to_ascii_uppercase);

    let method = match requested.as_deref() {
        Some("PUT") => Method::PUT,
        Some("DELETE") => Method::DELETE,
        Some("PATCH") => Method::PATCH,
        _ => return request,
    };
    *request.method_mut() = method;
    request
}

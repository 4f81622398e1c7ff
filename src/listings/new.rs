use axum::{
    debug_handler,
    extract::{multipart::MultipartRejection, Multipart, State},
    response::{IntoResponse, Response},
};
use sqlx::SqlitePool;

use crate::{
    db::listings,
    guard, include_res, res,
    session::{self, Ctx},
    uploads::ImageStore,
    AppResult, AppState,
};

use super::form;

#[debug_handler(state = AppState)]
pub(crate) async fn render_new_form(ctx: Ctx) -> AppResult<Response> {
    guard::is_logged_in(&ctx)?;

    Ok(res::page(&ctx, "New Listing", include_res!(str, "/pages/listings/new.html")).await?.into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn create_listing(
    State(db_pool): State<SqlitePool>,
    State(images): State<ImageStore>,
    ctx: Ctx,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Response> {
    let user = guard::is_logged_in(&ctx)?;
    let (fields, upload) = form::read_valid(multipart?).await?;

    let image = match &upload {
        Some(upload) => Some(images.save(upload).await?),
        None => None,
    };
    let listing = listings::create(&db_pool, user.id, fields, image).await?;

    tracing::info!("u/{} listed {} ({})", user.username, listing.title, listing.id);
    Ok(session::success(&format!("/listings/{}", listing.id), "New Listing Created!"))
}

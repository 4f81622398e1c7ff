use axum::{
    debug_handler,
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    response::{IntoResponse, Response},
};
use sqlx::SqlitePool;

use crate::{
    db::{self, listings},
    guard::{self, LISTING_MISSING},
    include_res,
    res::{self, escape, PLACEHOLDER_IMAGE},
    session::{self, Ctx},
    uploads::ImageStore,
    AppError, AppResult, AppState,
};

use super::form;

#[debug_handler(state = AppState)]
pub(crate) async fn render_edit_form(
    State(db_pool): State<SqlitePool>,
    Path(id): Path<String>,
    ctx: Ctx,
) -> AppResult<Response> {
    let user = guard::is_logged_in(&ctx)?;
    let id = db::parse_id(&id, || AppError::not_found(LISTING_MISSING, "/listings"))?;
    let listing = guard::is_owner(&db_pool, user, id).await?;

    let body = include_res!(str, "/pages/listings/edit.html")
        .replace("{id}", &id.to_string())
        .replace("{image_url}", &escape(listing.image_url.as_deref().unwrap_or(PLACEHOLDER_IMAGE)))
        .replace("{price}", &listing.price.to_string())
        .replace("{title}", &escape(&listing.title))
        .replace("{description}", &escape(&listing.description))
        .replace("{country}", &escape(&listing.country))
        .replace("{location}", &escape(&listing.location));

    Ok(res::page(&ctx, "Edit Listing", &body).await?.into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn update_listing(
    State(db_pool): State<SqlitePool>,
    State(images): State<ImageStore>,
    Path(id): Path<String>,
    ctx: Ctx,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Response> {
    let user = guard::is_logged_in(&ctx)?;
    let id = db::parse_id(&id, || AppError::not_found(LISTING_MISSING, "/listings"))?;
    let listing = guard::is_owner(&db_pool, user, id).await?;
    let (fields, upload) = form::read_valid(multipart?).await?;

    let image = match &upload {
        Some(upload) => Some(images.save(upload).await?),
        None => None,
    };
    listings::update(&db_pool, id, &fields, image.as_ref()).await?;

    if let (Some(_), Some(old)) = (&image, listing.image()) {
        images.remove(&old).await;
    }

    Ok(session::success(&format!("/listings/{id}"), "Listing Updated!"))
}

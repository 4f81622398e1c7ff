use axum::{debug_handler, extract::State, response::{IntoResponse, Response}};
use sqlx::SqlitePool;

use crate::{db::listings, include_res, res::{self, escape, PLACEHOLDER_IMAGE}, session::Ctx, AppResult, AppState};

#[debug_handler(state = AppState)]
pub(crate) async fn index(
    State(db_pool): State<SqlitePool>,
    ctx: Ctx,
) -> AppResult<Response> {
    let mut cards = String::new();
    for listing in listings::all(&db_pool).await? {
        cards += &include_res!(str, "/pages/listings/card.html")
            .replace("{id}", &listing.id.to_string())
            .replace("{image_url}", &escape(listing.image_url.as_deref().unwrap_or(PLACEHOLDER_IMAGE)))
            .replace("{title}", &escape(&listing.title))
            .replace("{price}", &listing.price.to_string());
    }

    let body = include_res!(str, "/pages/listings/index.html").replace("{cards}", &cards);
    Ok(res::page(&ctx, "All Listings", &body).await?.into_response())
}

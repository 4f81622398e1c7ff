use axum::{debug_handler, extract::{Path, State}, response::Response};
use sqlx::SqlitePool;

use crate::{
    db::{self, listings},
    guard::{self, LISTING_MISSING},
    session::{self, Ctx},
    uploads::ImageStore,
    AppError, AppResult, AppState,
};

#[debug_handler(state = AppState)]
pub(crate) async fn delete_listing(
    State(db_pool): State<SqlitePool>,
    State(images): State<ImageStore>,
    Path(id): Path<String>,
    ctx: Ctx,
) -> AppResult<Response> {
    let user = guard::is_logged_in(&ctx)?;
    let id = db::parse_id(&id, || AppError::not_found(LISTING_MISSING, "/listings"))?;
    let listing = guard::is_owner(&db_pool, user, id).await?;

    listings::delete(&db_pool, id).await?;
    if let Some(image) = listing.image() {
        images.remove(&image).await;
    }

    tracing::info!("u/{} deleted listing {id}", user.username);
    Ok(session::success("/listings", "Listing Deleted!"))
}

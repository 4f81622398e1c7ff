use axum::{debug_handler, extract::{Path, State}, response::Response};
use sqlx::SqlitePool;

use crate::{
    db::{self, reviews},
    guard::{self, LISTING_MISSING},
    session::{self, Ctx},
    AppError, AppResult, AppState,
};

use super::ReviewPath;

#[debug_handler(state = AppState)]
pub(crate) async fn delete_review(
    State(db_pool): State<SqlitePool>,
    Path(ReviewPath { id, review_id }): Path<ReviewPath>,
    ctx: Ctx,
) -> AppResult<Response> {
    let user = guard::is_logged_in(&ctx)?;
    let id = db::parse_id(&id, || AppError::not_found(LISTING_MISSING, "/listings"))?;
    let review_id = db::parse_id(&review_id, || AppError::not_found("Review does not exist!", format!("/listings/{id}")))?;
    guard::is_review_author(&db_pool, user, id, review_id).await?;

    reviews::delete(&db_pool, id, review_id).await?;

    Ok(session::success(&format!("/listings/{id}"), "Review Deleted!"))
}

use axum::{
    debug_handler,
    extract::{rejection::FormRejection, Path, State},
    response::Response,
    Form,
};
use sqlx::SqlitePool;

use crate::{
    db::{self, listings, reviews},
    guard::{self, LISTING_MISSING},
    session::{self, Ctx},
    validate::{self, ReviewForm},
    AppError, AppResult, AppState,
};

#[debug_handler(state = AppState)]
pub(crate) async fn create_review(
    State(db_pool): State<SqlitePool>,
    Path(id): Path<String>,
    ctx: Ctx,
    form: Result<Form<ReviewForm>, FormRejection>,
) -> AppResult<Response> {
    let user = guard::is_logged_in(&ctx)?;
    let Form(form) = form?;
    let fields = validate::validate_review(&form)?;

    let missing = || AppError::not_found(LISTING_MISSING, "/listings");
    let id = db::parse_id(&id, missing)?;
    if listings::find(&db_pool, id).await?.is_none() {
        return Err(missing());
    }

    let review = reviews::create(&db_pool, id, user.id, fields).await?;

    tracing::info!("u/{} reviewed {id} ({} stars)", user.username, review.rating);
    Ok(session::success(&format!("/listings/{id}"), "New Review Created!"))
}

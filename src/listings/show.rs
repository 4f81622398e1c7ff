use axum::{debug_handler, extract::{Path, State}, response::{IntoResponse, Response}};
use sqlx::SqlitePool;

use crate::{
    db::{self, listings, ReviewView},
    guard::LISTING_MISSING,
    include_res,
    res::{self, escape, PLACEHOLDER_IMAGE},
    session::Ctx,
    AppError, AppResult, AppState,
};

#[debug_handler(state = AppState)]
pub(crate) async fn show_listing(
    State(db_pool): State<SqlitePool>,
    Path(id): Path<String>,
    ctx: Ctx,
) -> AppResult<Response> {
    let missing = || AppError::not_found(LISTING_MISSING, "/listings");
    let id = db::parse_id(&id, missing)?;
    let Some(detail) = listings::find_detail(&db_pool, id).await? else {
        return Err(missing());
    };
    let listing = &detail.listing;
    let viewer = ctx.user_id();

    let owner_actions = if viewer == Some(listing.owner_id) {
        include_res!(str, "/pages/listings/owner_actions.html").replace("{id}", &id.to_string())
    } else {
        String::new()
    };

    let review_form = if viewer.is_some() {
        include_res!(str, "/pages/listings/review_form.html").replace("{id}", &id.to_string())
    } else {
        String::new()
    };

    let mut reviews = String::new();
    for review in &detail.reviews {
        reviews += &review_html(id, review, viewer == Some(review.author_id));
    }

    let body = include_res!(str, "/pages/listings/show.html")
        .replace("{id}", &id.to_string())
        .replace("{title}", &escape(&listing.title))
        .replace("{image_url}", &escape(listing.image_url.as_deref().unwrap_or(PLACEHOLDER_IMAGE)))
        .replace("{owner}", &escape(&detail.owner.username))
        .replace("{description}", &res::markdown(&listing.description))
        .replace("{price}", &listing.price.to_string())
        .replace("{location}", &escape(&listing.location))
        .replace("{country}", &escape(&listing.country))
        .replace("{owner_actions}", &owner_actions)
        .replace("{review_form}", &review_form)
        .replace("{reviews}", &reviews);

    Ok(res::page(&ctx, &listing.title, &body).await?.into_response())
}

fn review_html(listing_id: uuid::Uuid, review: &ReviewView, is_author: bool) -> String {
    let stars = usize::try_from(review.rating).unwrap_or(0);
    let delete = if is_author {
        include_res!(str, "/pages/listings/review_delete.html")
            .replace("{id}", &listing_id.to_string())
            .replace("{review_id}", &review.id.to_string())
    } else {
        String::new()
    };

    include_res!(str, "/pages/listings/review.html")
        .replace("{review_id}", &review.id.to_string())
        .replace("{author}", &escape(&review.author_username))
        .replace("{rating}", &review.rating.to_string())
        .replace("{stars}", &format!("{}{}", "&#9733;".repeat(stars), "&#9734;".repeat(5usize.saturating_sub(stars))))
        .replace("{created_at}", &review.created_at.date().to_string())
        .replace("{delete}", &delete)
        .replace("{comment}", &escape(&review.comment))
}

//! Authorization guards.
//!
//! Handlers call these in order and bail out with `?`. Each one hands back
//! whatever it had to load to make its decision.

use axum::http::Method;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    db::{listings, reviews, CurrentUser, Listing, Review},
    session::Ctx,
    AppError, AppResult,
};

pub const LISTING_MISSING: &str = "Listing you requested for does not exist!";

pub fn is_logged_in(ctx: &Ctx) -> AppResult<&CurrentUser> {
    match &ctx.user {
        Some(user) => Ok(user),
        None => Err(AppError::Unauthenticated {
            // only pages can be returned to
            return_to: (ctx.method == Method::GET)
                .then(|| ctx.uri.path_and_query().map(|pq| pq.to_string()))
                .flatten(),
        }),
    }
}

pub async fn is_owner(db_pool: &SqlitePool, user: &CurrentUser, listing_id: Uuid) -> AppResult<Listing> {
    let Some(listing) = listings::find(db_pool, listing_id).await? else {
        return Err(AppError::not_found(LISTING_MISSING, "/listings"));
    };

    if listing.owner_id != user.id {
        tracing::debug!("u/{} is not the owner of {listing_id}", user.username);
        return Err(AppError::forbidden(
            "You are not the owner of this listing",
            format!("/listings/{listing_id}"),
        ));
    }

    Ok(listing)
}

pub async fn is_review_author(db_pool: &SqlitePool, user: &CurrentUser, listing_id: Uuid, review_id: Uuid) -> AppResult<Review> {
    let back = format!("/listings/{listing_id}");

    let Some(review) = reviews::find_in_listing(db_pool, listing_id, review_id).await? else {
        return Err(AppError::not_found("Review does not exist!", back));
    };

    if review.author_id != user.id {
        return Err(AppError::forbidden("You are not the author of this review", back));
    }

    Ok(review)
}

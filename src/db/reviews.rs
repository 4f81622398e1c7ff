use sqlx::SqlitePool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{Review, ReviewFields};
use crate::AppResult;

/// Only finds the review if it sits in that listing's collection.
pub async fn find_in_listing(db_pool: &SqlitePool, listing_id: Uuid, review_id: Uuid) -> AppResult<Option<Review>> {
    Ok(
        sqlx::query_as::<_, Review>(
            "SELECT r.id,r.comment,r.rating,r.author_id,r.created_at
             FROM listing_reviews lr JOIN reviews r ON r.id=lr.review_id
             WHERE lr.listing_id=? AND lr.review_id=?"
        )
            .bind(listing_id)
            .bind(review_id)
            .fetch_optional(db_pool)
            .await?
    )
}

/// Inserts the review and appends it to the end of the listing's collection.
pub async fn create(db_pool: &SqlitePool, listing_id: Uuid, author_id: Uuid, fields: ReviewFields) -> AppResult<Review> {
    let review = Review {
        id: Uuid::now_v7(),
        comment: fields.comment,
        rating: fields.rating,
        author_id,
        created_at: OffsetDateTime::now_utc(),
    };

    let mut tx = db_pool.begin().await?;

    sqlx::query("INSERT INTO reviews (id,comment,rating,author_id,created_at) VALUES (?,?,?,?,?)")
        .bind(review.id)
        .bind(&review.comment)
        .bind(review.rating)
        .bind(review.author_id)
        .bind(review.created_at)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        "INSERT INTO listing_reviews (listing_id,review_id,position)
         SELECT ?, ?, COALESCE(MAX(position), -1) + 1 FROM listing_reviews WHERE listing_id=?"
    )
        .bind(listing_id)
        .bind(review.id)
        .bind(listing_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(review)
}

/// Pulls the review out of the listing's collection and deletes it.
pub async fn delete(db_pool: &SqlitePool, listing_id: Uuid, review_id: Uuid) -> AppResult<()> {
    let mut tx = db_pool.begin().await?;

    sqlx::query("DELETE FROM listing_reviews WHERE listing_id=? AND review_id=?")
        .bind(listing_id)
        .bind(review_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM reviews WHERE id=?")
        .bind(review_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

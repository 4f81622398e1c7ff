use sqlx::SqlitePool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{CurrentUser, Image, Listing, ListingDetail, ListingFields, ReviewView};
use crate::AppResult;

const COLUMNS: &str = "id,title,description,image_url,image_filename,price,location,country,owner_id,created_at";

/// Every listing, in the order they were created.
pub async fn all(db_pool: &SqlitePool) -> AppResult<Vec<Listing>> {
    Ok(
        sqlx::query_as::<_, Listing>(&format!("SELECT {COLUMNS} FROM listings ORDER BY rowid"))
            .fetch_all(db_pool)
            .await?
    )
}

pub async fn find(db_pool: &SqlitePool, id: Uuid) -> AppResult<Option<Listing>> {
    Ok(
        sqlx::query_as::<_, Listing>(&format!("SELECT {COLUMNS} FROM listings WHERE id=?"))
            .bind(id)
            .fetch_optional(db_pool)
            .await?
    )
}

/// The listing with its owner and reviews (oldest first) filled in.
pub async fn find_detail(db_pool: &SqlitePool, id: Uuid) -> AppResult<Option<ListingDetail>> {
    let Some(listing) = find(db_pool, id).await? else {
        return Ok(None);
    };

    let owner = sqlx::query_as::<_, CurrentUser>("SELECT id,username FROM users WHERE id=?")
        .bind(listing.owner_id)
        .fetch_one(db_pool)
        .await?;

    let reviews = sqlx::query_as::<_, ReviewView>(
        "SELECT r.id,r.comment,r.rating,r.author_id,u.username AS author_username,r.created_at
         FROM listing_reviews lr
         JOIN reviews r ON r.id=lr.review_id
         JOIN users u ON u.id=r.author_id
         WHERE lr.listing_id=?
         ORDER BY lr.position"
    )
        .bind(id)
        .fetch_all(db_pool)
        .await?;

    Ok(Some(ListingDetail { listing, owner, reviews }))
}

pub async fn create(db_pool: &SqlitePool, owner_id: Uuid, fields: ListingFields, image: Option<Image>) -> AppResult<Listing> {
    let (image_url, image_filename) = match image {
        Some(Image { url, filename }) => (Some(url), Some(filename)),
        None => (None, None),
    };
    let listing = Listing {
        id: Uuid::now_v7(),
        title: fields.title,
        description: fields.description,
        image_url,
        image_filename,
        price: fields.price,
        location: fields.location,
        country: fields.country,
        owner_id,
        created_at: OffsetDateTime::now_utc(),
    };

    sqlx::query(&format!("INSERT INTO listings ({COLUMNS}) VALUES (?,?,?,?,?,?,?,?,?,?)"))
        .bind(listing.id)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(&listing.image_url)
        .bind(&listing.image_filename)
        .bind(listing.price)
        .bind(&listing.location)
        .bind(&listing.country)
        .bind(listing.owner_id)
        .bind(listing.created_at)
        .execute(db_pool)
        .await?;

    Ok(listing)
}

/// Overwrites every field but the owner. The image is only replaced when a new one is given.
pub async fn update(db_pool: &SqlitePool, id: Uuid, fields: &ListingFields, image: Option<&Image>) -> AppResult<()> {
    match image {
        Some(image) => {
            sqlx::query("UPDATE listings SET title=?,description=?,price=?,location=?,country=?,image_url=?,image_filename=? WHERE id=?")
                .bind(&fields.title)
                .bind(&fields.description)
                .bind(fields.price)
                .bind(&fields.location)
                .bind(&fields.country)
                .bind(&image.url)
                .bind(&image.filename)
                .bind(id)
                .execute(db_pool)
                .await?;
        }
        None => {
            sqlx::query("UPDATE listings SET title=?,description=?,price=?,location=?,country=? WHERE id=?")
                .bind(&fields.title)
                .bind(&fields.description)
                .bind(fields.price)
                .bind(&fields.location)
                .bind(&fields.country)
                .bind(id)
                .execute(db_pool)
                .await?;
        }
    }

    Ok(())
}

/// Deletes the listing together with every review in its collection.
pub async fn delete(db_pool: &SqlitePool, id: Uuid) -> AppResult<()> {
    let mut tx = db_pool.begin().await?;

    let review_ids: Vec<(Uuid,)> = sqlx::query_as("SELECT review_id FROM listing_reviews WHERE listing_id=?")
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM listing_reviews WHERE listing_id=?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    for (review_id,) in &review_ids {
        sqlx::query("DELETE FROM reviews WHERE id=?")
            .bind(review_id)
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query("DELETE FROM listings WHERE id=?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::debug!("deleted listing {id} and {} reviews", review_ids.len());
    Ok(())
}

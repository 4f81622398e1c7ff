pub mod listings;
pub mod reviews;
pub mod users;

use sqlx::{sqlite::SqlitePoolOptions, FromRow, SqlitePool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::AppError;

pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let db_pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect(database_url)
        .await?;
    migrate(&db_pool).await?;
    Ok(db_pool)
}

pub async fn migrate(db_pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(db_pool).await
}

/// Ids arrive as raw path segments; anything that isn't a UUID can't name a record.
pub fn parse_id(raw: &str, not_found: impl FnOnce() -> AppError) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| not_found())
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

/// The part of a user a request needs to know about.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub url: String,
    pub filename: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct Listing {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub image_filename: Option<String>,
    pub price: f64,
    pub location: String,
    pub country: String,
    pub owner_id: Uuid,
    pub created_at: OffsetDateTime,
}

impl Listing {
    pub fn image(&self) -> Option<Image> {
        match (&self.image_url, &self.image_filename) {
            (Some(url), Some(filename)) => Some(Image { url: url.clone(), filename: filename.clone() }),
            _ => None,
        }
    }
}

/// Fields a listing is created or updated from, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingFields {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: String,
    pub country: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub comment: String,
    pub rating: i64,
    pub author_id: Uuid,
    pub created_at: OffsetDateTime,
}

/// A review as shown under its listing.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewView {
    pub id: Uuid,
    pub comment: String,
    pub rating: i64,
    pub author_id: Uuid,
    pub author_username: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewFields {
    pub comment: String,
    pub rating: i64,
}

/// A listing with its owner and review collection populated.
#[derive(Debug, Clone)]
pub struct ListingDetail {
    pub listing: Listing,
    pub owner: CurrentUser,
    pub reviews: Vec<ReviewView>,
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let db_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    migrate(&db_pool).await.unwrap();
    db_pool
}

use sqlx::SqlitePool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{CurrentUser, User};
use crate::AppResult;

/// `None` when the username is already taken.
pub async fn create(db_pool: &SqlitePool, username: &str, email: &str, password_hash: &str) -> AppResult<Option<User>> {
    let user = User {
        id: Uuid::now_v7(),
        username: username.to_owned(),
        email: email.to_owned(),
        password_hash: password_hash.to_owned(),
        created_at: OffsetDateTime::now_utc(),
    };

    let inserted = sqlx::query("INSERT INTO users (id,username,email,password_hash,created_at) VALUES (?,?,?,?,?) ON CONFLICT (username) DO NOTHING")
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(db_pool)
        .await?
        .rows_affected();

    Ok((inserted == 1).then_some(user))
}

pub async fn find_by_username(db_pool: &SqlitePool, username: &str) -> AppResult<Option<User>> {
    Ok(
        sqlx::query_as::<_, User>("SELECT id,username,email,password_hash,created_at FROM users WHERE username=?")
            .bind(username)
            .fetch_optional(db_pool)
            .await?
    )
}

pub async fn find_current(db_pool: &SqlitePool, id: Uuid) -> AppResult<Option<CurrentUser>> {
    Ok(
        sqlx::query_as::<_, CurrentUser>("SELECT id,username FROM users WHERE id=?")
            .bind(id)
            .fetch_optional(db_pool)
            .await?
    )
}

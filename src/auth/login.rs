use axum::{debug_handler, extract::State, response::{IntoResponse, Response}, Form};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{
    db::users,
    include_res, res,
    session::{self, Ctx, RETURN_URL, USER_ID},
    AppResult, AppState,
};

use super::password;

#[derive(Deserialize)]
pub(crate) struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn login_page(ctx: Ctx) -> AppResult<Response> {
    Ok(res::page(&ctx, "Login", include_res!(str, "/pages/users/login.html")).await?.into_response())
}

#[debug_handler]
pub(crate) async fn login(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(LoginForm { username, password }): Form<LoginForm>,
) -> AppResult<Response> {
    let user = match users::find_by_username(&db_pool, username.trim()).await? {
        Some(user) if password::verify(&password, &user.password_hash)? => user,
        _ => {
            tracing::debug!("rejected login for {username:?}");
            return Ok(session::error("/login", "Password or username is incorrect"));
        }
    };

    let return_url = session.remove::<String>(RETURN_URL).await?;
    session.cycle_id().await?;
    session.insert(USER_ID, user.id).await?;

    tracing::info!("welcome back u/{}", user.username);
    Ok(session::success(
        return_url.as_deref().unwrap_or("/listings"),
        "Welcome back to Wanderlust!",
    ))
}

use axum::{debug_handler, extract::State, response::{IntoResponse, Response}, Form};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{
    db::users,
    include_res, res,
    session::{self, Ctx, USER_ID},
    AppResult, AppState,
};

use super::password;

#[derive(Deserialize)]
pub(crate) struct SignupForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn signup_page(ctx: Ctx) -> AppResult<Response> {
    Ok(res::page(&ctx, "Sign up", include_res!(str, "/pages/users/signup.html")).await?.into_response())
}

#[debug_handler]
pub(crate) async fn signup(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(SignupForm { username, email, password }): Form<SignupForm>,
) -> AppResult<Response> {
    let (username, email) = (username.trim(), email.trim());
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Ok(session::error("/signup", "Username, email and password are all required"));
    }

    let hash = password::hash(&password)?;
    let Some(user) = users::create(&db_pool, username, email, &hash).await? else {
        return Ok(session::error("/signup", "A user with the given username is already registered"));
    };

    session.cycle_id().await?;
    session.insert(USER_ID, user.id).await?;

    tracing::info!("adding u/{}#{}", user.username, user.id);
    Ok(session::success("/listings", "Welcome to Wanderlust!"))
}

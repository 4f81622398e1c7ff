//! Session keys, flash messages and the per-request context.

use axum::{
    extract::{FromRef, FromRequestParts, OriginalUri, Request},
    http::{request::Parts, Method, Uri},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{db::{self, CurrentUser}, AppError, AppResult, AppState};

pub const USER_ID: &str = "user_id";
pub const RETURN_URL: &str = "return_url";
pub const FLASH: &str = "flash";
pub const LAST_TOUCH: &str = "last_touch";

/// Sessions are written back at most this often when nothing else changed.
pub const TOUCH_AFTER: time::Duration = time::Duration::hours(24);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

/// A flash message travelling on a response until [`persist_flash`] stores it.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: FlashKind,
    pub message: String,
}

/// URL to come back to after logging in.
#[derive(Debug, Clone)]
pub struct ReturnTo(pub String);

/// Pending flash messages, read and cleared by the next rendered page.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    pub success: Vec<String>,
    pub error: Vec<String>,
}

impl Flash {
    fn push(&mut self, Notice { kind, message }: Notice) {
        match kind {
            FlashKind::Success => self.success.push(message),
            FlashKind::Error => self.error.push(message),
        }
    }
}

pub fn redirect_with(to: &str, kind: FlashKind, message: impl Into<String>) -> Response {
    let mut response = Redirect::to(to).into_response();
    response.extensions_mut().insert(Notice { kind, message: message.into() });
    response
}

pub fn success(to: &str, message: impl Into<String>) -> Response {
    redirect_with(to, FlashKind::Success, message)
}

pub fn error(to: &str, message: impl Into<String>) -> Response {
    redirect_with(to, FlashKind::Error, message)
}

/// Moves any [`Notice`] or [`ReturnTo`] attached to the response into the session.
pub async fn persist_flash(session: Session, request: Request, next: Next) -> AppResult<Response> {
    let mut response = next.run(request).await;

    if let Some(notice) = response.extensions_mut().remove::<Notice>() {
        let mut flash = session.get::<Flash>(FLASH).await?.unwrap_or_default();
        flash.push(notice);
        session.insert(FLASH, flash).await?;
    }
    if let Some(ReturnTo(url)) = response.extensions_mut().remove::<ReturnTo>() {
        session.insert(RETURN_URL, url).await?;
    }

    Ok(response)
}

/// Refreshes the inactivity expiry of a live session once per [`TOUCH_AFTER`].
pub async fn touch(session: Session, request: Request, next: Next) -> AppResult<Response> {
    if !session.is_empty().await {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let last = session.get::<i64>(LAST_TOUCH).await?.unwrap_or(0);
        if now - last >= TOUCH_AFTER.whole_seconds() {
            session.insert(LAST_TOUCH, now).await?;
        }
    }

    Ok(next.run(request).await)
}

/// Per-request context: who is asking, and for what.
pub struct Ctx {
    pub session: Session,
    pub user: Option<CurrentUser>,
    pub method: Method,
    pub uri: Uri,
}

impl Ctx {
    pub async fn take_flash(&self) -> AppResult<Flash> {
        Ok(self.session.remove::<Flash>(FLASH).await?.unwrap_or_default())
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user.as_ref().map(|user| user.id)
    }
}

impl<S> FromRequestParts<S> for Ctx
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::from(msg))?;
        let AppState { db_pool, .. } = AppState::from_ref(state);

        let user = match session.get::<Uuid>(USER_ID).await? {
            Some(user_id) => db::users::find_current(&db_pool, user_id).await?,
            None => None,
        };

        let uri = match parts.extensions.get::<OriginalUri>() {
            Some(OriginalUri(uri)) => uri.clone(),
            None => parts.uri.clone(),
        };

        Ok(Ctx {
            session,
            user,
            method: parts.method.clone(),
            uri,
        })
    }
}

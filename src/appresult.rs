use axum::{
    extract::{multipart::{MultipartError, MultipartRejection}, rejection::FormRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{res, session::{self, FlashKind}};

pub type AppResult<T> = Result<T, AppError>;

/// Everything a handler can fail with.
///
/// Authorization failures and missing records that have somewhere sensible to
/// send the user become a flash message plus a redirect. The rest render the
/// error page with their status.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("You must be logged in first!")]
    Unauthenticated { return_to: Option<String> },

    #[error("{message}")]
    Forbidden { message: String, redirect: String },

    #[error("{0}")]
    Validation(String),

    /// The request body couldn't be read, e.g. it was over the size limit.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("{message}")]
    NotFound { message: String, redirect: Option<String> },

    #[error(transparent)]
    Unexpected(anyhow::Error),
}

impl AppError {
    pub fn forbidden(message: impl Into<String>, redirect: impl Into<String>) -> Self {
        Self::Forbidden { message: message.into(), redirect: redirect.into() }
    }

    pub fn not_found(message: impl Into<String>, redirect: impl Into<String>) -> Self {
        Self::NotFound { message: message.into(), redirect: Some(redirect.into()) }
    }

    pub fn page_not_found() -> Self {
        Self::NotFound { message: "Page Not Found!".to_owned(), redirect: None }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Rejected { status, .. } => *status,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            Self::Unauthenticated { return_to } => {
                let mut response = session::redirect_with("/login", FlashKind::Error, "You must be logged in first!");
                if let Some(return_to) = return_to {
                    response.extensions_mut().insert(session::ReturnTo(return_to));
                }
                response
            }
            Self::Forbidden { message, redirect } => {
                session::redirect_with(&redirect, FlashKind::Error, message)
            }
            Self::NotFound { message, redirect: Some(redirect) } => {
                session::redirect_with(&redirect, FlashKind::Error, message)
            }
            Self::NotFound { message, redirect: None } | Self::Validation(message) | Self::Rejected { message, .. } => {
                (status, res::error_page(&message)).into_response()
            }
            Self::Unexpected(err) => {
                tracing::error!("unhandled error: {err:?}");
                (status, res::error_page("Something went wrong!")).into_response()
            }
        }
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        Self::Unexpected(anyhow::Error::msg(err))
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        Self::Unexpected(anyhow::Error::msg(err.to_owned()))
    }
}

macro_rules! apperr_impl {
    ($E:ty) => {
        impl From<$E> for AppError {
            fn from(err: $E) -> Self {
                Self::Unexpected(anyhow::Error::from(err))
            }
        }
    };
}

apperr_impl!(anyhow::Error);
apperr_impl!(sqlx::Error);
apperr_impl!(tower_sessions::session::Error);
apperr_impl!(std::io::Error);

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        let status = err.status();
        tracing::debug!("unreadable multipart body: {err}");
        let message = if status == StatusCode::PAYLOAD_TOO_LARGE {
            "Image is too large".to_owned()
        } else {
            err.body_text()
        };
        Self::Rejected { status, message }
    }
}

impl From<MultipartRejection> for AppError {
    fn from(err: MultipartRejection) -> Self {
        Self::Rejected { status: err.status(), message: err.body_text() }
    }
}

impl From<FormRejection> for AppError {
    fn from(err: FormRejection) -> Self {
        Self::Rejected { status: err.status(), message: err.body_text() }
    }
}

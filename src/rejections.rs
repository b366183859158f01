use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{html, Markup};

use crate::views;

#[derive(Debug)]
pub enum AppError {
    Internal(&'static str),
    Unauthorized,
    NotFound,
    Input(&'static str),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Input(_) => (StatusCode::BAD_REQUEST, "INPUT_ERROR"),
        };

        (code, error_page(message)).into_response()
    }
}

fn error_page(message: &str) -> Markup {
    views::page(
        "Error",
        html! {
            h1 { (message) }
            p { a href="/" { "Home" } }
        },
    )
}

/// Log the error chain and surface a generic failure to the client; the
/// message names the failed step, not the underlying error.
pub trait ResultExt<T> {
    fn reject(self, message: &'static str) -> Result<T, AppError>;
    fn reject_input(self, message: &'static str) -> Result<T, AppError>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn reject(self, message: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::error!("{message}: {e}");
            AppError::Internal(message)
        })
    }

    fn reject_input(self, message: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::warn!("{message}: {e}");
            AppError::Input(message)
        })
    }
}

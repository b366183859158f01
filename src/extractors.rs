use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum_extra::extract::CookieJar;

use crate::{names, rejections::AppError, AppState};

/// Extracts the UI locale from the `lang` cookie, falling back to the
/// browser's `Accept-Language` header, then to `"en"`.
pub struct Locale(pub String);

impl<S: Send + Sync> FromRequestParts<S> for Locale {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let locale = jar
            .get(names::LOCALE_COOKIE_NAME)
            .and_then(|c| match_supported_locale(c.value()))
            .or_else(|| {
                parts
                    .headers
                    .get(header::ACCEPT_LANGUAGE)
                    .and_then(|v| v.to_str().ok())
                    .and_then(locale_from_accept_language)
            })
            .unwrap_or(names::DEFAULT_LOCALE);
        Ok(Locale(locale.to_string()))
    }
}

fn match_supported_locale(lang: &str) -> Option<&'static str> {
    if lang == "zh" || lang.starts_with("zh-") {
        return Some("zh");
    }
    if lang == "en" || lang.starts_with("en-") {
        return Some("en");
    }
    None
}

/// First supported language in the header, in listed order.
fn locale_from_accept_language(header: &str) -> Option<&'static str> {
    header
        .split(',')
        .map(|entry| entry.trim().split(';').next().unwrap_or("").trim())
        .find_map(match_supported_locale)
}

/// Guard extractor verifying the admin session cookie against the store.
pub struct AdminGuard;

impl FromRequestParts<AppState> for AdminGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        if let Some(session) = jar
            .get(names::ADMIN_SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
        {
            let exists = state
                .db
                .admin_session_exists(&session)
                .await
                .unwrap_or(false);
            if exists {
                return Ok(AdminGuard);
            }
        }

        Err(AppError::Unauthorized)
    }
}

//! Session cookie extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::api::AppState;
use crate::config::SESSION_COOKIE_NAME;
use crate::domain::AccountView;
use crate::errors::AppError;

/// Account resolved from a valid `session` cookie.
///
/// Rejects with `Unauthorized` when the cookie is missing, tampered with
/// or expired.
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub AccountView);

#[async_trait]
impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let cookie = jar.get(SESSION_COOKIE_NAME).ok_or(AppError::Unauthorized)?;

        let claims = state.sessions.verify(cookie.value())?;
        Ok(Self(AccountView::from(&claims)))
    }
}

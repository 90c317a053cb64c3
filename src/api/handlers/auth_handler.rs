//! Authentication handlers.

use axum::{extract::State, routing::post, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{CurrentAccount, ValidatedJson};
use crate::api::AppState;
use crate::config::SESSION_COOKIE_NAME;
use crate::domain::{AccountView, Credentials};
use crate::errors::{AppError, AppResult};
use crate::services::SessionToken;
use crate::types::{ApiResponse, Created};

/// Sign-up and sign-in payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CredentialsRequest {
    /// Account email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Account password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
}

impl From<CredentialsRequest> for Credentials {
    fn from(request: CredentialsRequest) -> Self {
        Credentials::new(request.email, request.password)
    }
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(sign_in).get(current_user))
        .route("/signup", post(sign_up))
        .route("/signout", post(sign_out))
}

fn session_cookie(session: SessionToken, state: &AppState) -> AppResult<Cookie<'static>> {
    let max_age = time::Duration::seconds(state.sessions.lifetime().num_seconds());
    let expires = time::OffsetDateTime::from_unix_timestamp(session.expires_at.timestamp())
        .map_err(|e| AppError::internal("Session.cookie", e.to_string()))?;

    Ok(Cookie::build((SESSION_COOKIE_NAME, session.token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .expires(expires)
        .build())
}

/// Register a new account and start a session
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "Authentication",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created, session cookie set", body = AccountView),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already taken")
    )
)]
pub async fn sign_up(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<CredentialsRequest>,
) -> AppResult<(CookieJar, Created<AccountView>)> {
    let account = state.auth_service.register(payload.into()).await?;
    let session = state.sessions.issue(&account)?;

    Ok((jar.add(session_cookie(session, &state)?), Created(account)))
}

/// Check credentials and start a session
#[utoipa::path(
    post,
    path = "/auth",
    tag = "Authentication",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Signed in, session cookie set", body = AccountView),
        (status = 400, description = "Invalid email or password")
    )
)]
pub async fn sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<CredentialsRequest>,
) -> AppResult<(CookieJar, ApiResponse<AccountView>)> {
    let account = state.auth_service.authenticate(payload.into()).await?;
    let session = state.sessions.issue(&account)?;

    Ok((jar.add(session_cookie(session, &state)?), ApiResponse::ok(account)))
}

/// Get the account behind the current session
#[utoipa::path(
    get,
    path = "/auth",
    tag = "Authentication",
    responses(
        (status = 200, description = "Current account", body = AccountView),
        (status = 401, description = "Missing or invalid session")
    ),
    security(("session_cookie" = []))
)]
pub async fn current_user(CurrentAccount(account): CurrentAccount) -> ApiResponse<AccountView> {
    ApiResponse::ok(account)
}

/// End the current session
///
/// Only the presence of the session cookie is checked. Its value is not
/// verified, so an expired token can still be cleared.
#[utoipa::path(
    post,
    path = "/auth/signout",
    tag = "Authentication",
    responses(
        (status = 200, description = "Session cookie cleared"),
        (status = 401, description = "No session cookie")
    )
)]
pub async fn sign_out(jar: CookieJar) -> AppResult<(CookieJar, ApiResponse<&'static str>)> {
    if jar.get(SESSION_COOKIE_NAME).is_none() {
        return Err(AppError::Unauthorized);
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE_NAME).path("/"));
    Ok((jar, ApiResponse::ok("Logged Out")))
}

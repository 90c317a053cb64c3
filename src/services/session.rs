//! Session tokens issued after a successful sign-up or sign-in.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::domain::AccountView;
use crate::errors::{AppError, AppResult};

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl From<&SessionClaims> for AccountView {
    fn from(claims: &SessionClaims) -> Self {
        AccountView {
            id: claims.sub,
            email: claims.email.clone(),
        }
    }
}

/// A signed token and the instant it stops being accepted.
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies HS256 session tokens.
pub struct SessionIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl SessionIssuer {
    pub fn new(secret: &[u8], lifetime_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            lifetime: Duration::hours(lifetime_hours),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.jwt_secret_bytes(), config.session_expiration_hours)
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Sign a fresh token for the account.
    pub fn issue(&self, account: &AccountView) -> AppResult<SessionToken> {
        let now = Utc::now();
        let expires_at = now + self.lifetime;

        let claims = SessionClaims {
            sub: account.id,
            email: account.email.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::infrastructure("SessionIssuer.issue", e))?;

        Ok(SessionToken { token, expires_at })
    }

    /// Decode a token, checking signature and expiry.
    ///
    /// Any failure is `Unauthorized`; the cause is only logged.
    pub fn verify(&self, token: &str) -> AppResult<SessionClaims> {
        decode::<SessionClaims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "session token rejected");
                AppError::Unauthorized
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    const SECRET: &[u8] = b"a-very-long-secret-for-the-test-suite";

    fn view() -> AccountView {
        AccountView {
            id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let issuer = SessionIssuer::new(SECRET, 336);
        let account = view();

        let session = issuer.issue(&account).unwrap();
        let claims = issuer.verify(&session.token).unwrap();

        assert_eq!(AccountView::from(&claims), account);
        assert_eq!(claims.exp - claims.iat, 336 * 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let session = SessionIssuer::new(SECRET, 1).issue(&view()).unwrap();
        let other = SessionIssuer::new(b"another-secret-that-is-long-enough!!", 1);

        let err = other.verify(&session.token).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_expired_token_rejected() {
        // Past the default 60s validation leeway
        let issuer = SessionIssuer::new(SECRET, -1);
        let session = issuer.issue(&view()).unwrap();

        let err = issuer.verify(&session.token).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_garbage_rejected() {
        let issuer = SessionIssuer::new(SECRET, 1);
        assert!(matches!(issuer.verify("not.a.jwt"), Err(AppError::Unauthorized)));
    }
}

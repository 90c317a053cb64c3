//! Account domain entity and related types.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Password;

/// Account domain entity.
///
/// Created once by registration and never mutated afterwards. Only
/// [`AccountView`] leaves the service boundary.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl Account {
    /// Stored credential as a verifiable value object.
    pub fn password(&self) -> Password {
        Password::from_hash(self.password_hash.clone())
    }

    /// Public projection of the account.
    pub fn view(&self) -> AccountView {
        AccountView {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

/// Account shape returned to callers (never includes the hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccountView {
    pub id: Uuid,
    #[schema(example = "user@example.com")]
    pub email: String,
}

/// Email and plaintext password supplied by a caller.
///
/// The password is consumed by the one hash or verify call that needs it
/// and is zeroized on drop.
#[derive(Debug)]
pub struct Credentials {
    email: String,
    password: SecretString,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn into_parts(self) -> (String, SecretString) {
        (self.email, self.password)
    }
}

//! Authentication service - Registration and credential verification.
//!
//! Owns the hashing policy, the duplicate-email check and the error
//! classification. Unknown email and wrong password are
//! indistinguishable to the caller: same kind, same message, and a hash
//! verification on both paths.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

use crate::config::{Config, DEFAULT_HASH_TIMEOUT_MS, DEFAULT_STORE_TIMEOUT_MS};
use crate::domain::{AccountView, Credentials, Password, PasswordPolicy};
use crate::errors::{AppError, AppResult};
use crate::infra::AccountGateway;

const REGISTER_OP: &str = "AuthService.register";
const AUTHENTICATE_OP: &str = "AuthService.authenticate";

/// Plaintext hashed once to build the timing decoy for unknown emails.
const DUMMY_PASSWORD: &str = "timing-decoy-not-a-real-password";

/// Tunables of the authentication service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSettings {
    pub password_policy: PasswordPolicy,
    /// Deadline for one gateway call
    pub store_timeout: Duration,
    /// Deadline for one hash or verify
    pub hash_timeout: Duration,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            password_policy: PasswordPolicy::default(),
            store_timeout: Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS),
            hash_timeout: Duration::from_millis(DEFAULT_HASH_TIMEOUT_MS),
        }
    }
}

impl AuthSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            password_policy: config.password_policy,
            store_timeout: config.store_timeout,
            hash_timeout: config.hash_timeout,
        }
    }
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account for a new email.
    ///
    /// # Errors
    /// `Conflict` if the email is taken (including a lost insert race),
    /// `Infrastructure` on storage, hashing or deadline failures.
    async fn register(&self, credentials: Credentials) -> AppResult<AccountView>;

    /// Check an email/password pair.
    ///
    /// # Errors
    /// `InvalidCredentials` for an unknown email or a wrong password,
    /// `Infrastructure` on storage, hashing or deadline failures.
    async fn authenticate(&self, credentials: Credentials) -> AppResult<AccountView>;
}

/// Concrete implementation of AuthService over an account gateway.
pub struct Authenticator<G: AccountGateway> {
    gateway: Arc<G>,
    settings: AuthSettings,
    dummy: OnceCell<Password>,
}

impl<G: AccountGateway> Authenticator<G> {
    /// Create new auth service instance
    pub fn new(gateway: Arc<G>, settings: AuthSettings) -> Self {
        Self {
            gateway,
            settings,
            dummy: OnceCell::new(),
        }
    }

    /// Run a gateway call under the store deadline.
    async fn with_deadline<T, F>(&self, op: &str, call: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        let deadline = self.settings.store_timeout;
        tokio::time::timeout(deadline, call)
            .await
            .map_err(|_| AppError::timeout(op, deadline))?
    }

    /// Run CPU-bound password work on the blocking pool under the hash deadline.
    async fn run_blocking<T, F>(&self, op: &str, work: F) -> AppResult<T>
    where
        F: FnOnce() -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let deadline = self.settings.hash_timeout;
        match tokio::time::timeout(deadline, tokio::task::spawn_blocking(work)).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(AppError::internal(op, join_err.to_string())),
            Err(_) => Err(AppError::timeout(op, deadline)),
        }
    }

    /// Hash built with the live policy so a decoy verify costs the same as a real one.
    async fn dummy_password(&self) -> AppResult<Password> {
        let policy = self.settings.password_policy;
        self.dummy
            .get_or_try_init(|| {
                self.run_blocking("Password.hash", move || {
                    Password::hash(&SecretString::from(DUMMY_PASSWORD.to_string()), &policy)
                })
            })
            .await
            .cloned()
    }

    async fn register_inner(&self, email: String, password: SecretString) -> AppResult<AccountView> {
        match self
            .with_deadline(
                "AccountGateway.find_by_email",
                self.gateway.find_by_email(&email),
            )
            .await
        {
            Ok(_) => return Err(AppError::Conflict),
            Err(AppError::NotFound) => {}
            Err(e) => return Err(e),
        }

        let policy = self.settings.password_policy;
        let hashed = self
            .run_blocking("Password.hash", move || Password::hash(&password, &policy))
            .await?;

        let account = self
            .with_deadline(
                "AccountGateway.insert",
                self.gateway.insert(&email, hashed.as_str()),
            )
            .await?;

        Ok(account.view())
    }

    async fn authenticate_inner(
        &self,
        email: String,
        password: SecretString,
    ) -> AppResult<AccountView> {
        let lookup = self
            .with_deadline(
                "AccountGateway.find_by_email",
                self.gateway.find_by_email(&email),
            )
            .await;

        let (stored, account) = match lookup {
            Ok(account) => (account.password(), Some(account)),
            Err(AppError::NotFound) => (self.dummy_password().await?, None),
            Err(e) => return Err(e),
        };

        let matched = self
            .run_blocking("Password.verify", move || stored.verify(&password))
            .await?;

        match account {
            Some(account) if matched => Ok(account.view()),
            _ => Err(AppError::InvalidCredentials),
        }
    }
}

#[async_trait]
impl<G: AccountGateway> AuthService for Authenticator<G> {
    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    async fn register(&self, credentials: Credentials) -> AppResult<AccountView> {
        let (email, password) = credentials.into_parts();
        let view = self
            .register_inner(email, password)
            .await
            .map_err(|e| e.context(REGISTER_OP))?;

        info!(account_id = %view.id, "account_registered");
        Ok(view)
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    async fn authenticate(&self, credentials: Credentials) -> AppResult<AccountView> {
        let (email, password) = credentials.into_parts();
        let result = self
            .authenticate_inner(email, password)
            .await
            .map_err(|e| e.context(AUTHENTICATE_OP));

        if let Err(AppError::InvalidCredentials) = &result {
            debug!("authentication_failed");
        }
        result
    }
}

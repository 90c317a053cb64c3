//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use ticketing_auth::domain::{Account, PasswordPolicy};
use ticketing_auth::errors::{AppError, AppResult};
use ticketing_auth::infra::AccountGateway;
use ticketing_auth::services::{AuthSettings, Authenticator};

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-testing-only-32chars";

/// Cheap Argon2 parameters so tests stay fast.
pub fn fast_settings() -> AuthSettings {
    AuthSettings {
        password_policy: PasswordPolicy {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        },
        ..AuthSettings::default()
    }
}

pub fn authenticator<G: AccountGateway>(gateway: Arc<G>) -> Authenticator<G> {
    Authenticator::new(gateway, fast_settings())
}

/// Account table held in memory, unique on email like the real one.
#[derive(Default)]
pub struct InMemoryGateway {
    accounts: Mutex<HashMap<String, Account>>,
    fail_lookups: AtomicBool,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent lookup fail as if the database were down.
    pub fn fail_lookups(&self) {
        self.fail_lookups.store(true, Ordering::SeqCst);
    }

    pub fn stored_hash(&self, email: &str) -> Option<String> {
        self.accounts
            .lock()
            .unwrap()
            .get(email)
            .map(|a| a.password_hash.clone())
    }

    pub fn len(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }
}

#[async_trait]
impl AccountGateway for InMemoryGateway {
    async fn find_by_email(&self, email: &str) -> AppResult<Account> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(AppError::internal(
                "InMemoryGateway.find_by_email",
                "connection refused",
            ));
        }

        self.accounts
            .lock()
            .unwrap()
            .get(email)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn insert(&self, email: &str, password_hash: &str) -> AppResult<Account> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(AppError::Conflict);
        }

        let account = Account {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        accounts.insert(email.to_string(), account.clone());
        Ok(account)
    }
}

/// Lookups never see existing rows, as when a concurrent register commits
/// between the check and the insert.
pub struct RacingGateway {
    pub inner: InMemoryGateway,
}

#[async_trait]
impl AccountGateway for RacingGateway {
    async fn find_by_email(&self, _email: &str) -> AppResult<Account> {
        Err(AppError::NotFound)
    }

    async fn insert(&self, email: &str, password_hash: &str) -> AppResult<Account> {
        self.inner.insert(email, password_hash).await
    }
}

/// Delays every call before delegating.
pub struct SlowGateway {
    pub inner: InMemoryGateway,
    pub delay: Duration,
}

#[async_trait]
impl AccountGateway for SlowGateway {
    async fn find_by_email(&self, email: &str) -> AppResult<Account> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_by_email(email).await
    }

    async fn insert(&self, email: &str, password_hash: &str) -> AppResult<Account> {
        tokio::time::sleep(self.delay).await;
        self.inner.insert(email, password_hash).await
    }
}

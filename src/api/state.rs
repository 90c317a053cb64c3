//! Application state - Dependency injection container.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, DEFAULT_REQUEST_TIMEOUT_MS};
use crate::infra::{AccountStore, Database};
use crate::services::{AuthService, AuthSettings, Authenticator, SessionIssuer};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Session token issuer
    pub sessions: Arc<SessionIssuer>,
    /// Database connection, pinged by the health check when present
    pub database: Option<Arc<Database>>,
    /// Deadline for a whole request
    pub request_timeout: Duration,
}

impl AppState {
    /// Wire the SeaORM account store, the authenticator and the session
    /// issuer from configuration.
    pub fn from_config(database: Arc<Database>, config: &Config) -> Self {
        let gateway = Arc::new(AccountStore::new(database.connection()));
        let auth_service = Arc::new(Authenticator::new(
            gateway,
            AuthSettings::from_config(config),
        ));

        Self {
            auth_service,
            sessions: Arc::new(SessionIssuer::from_config(config)),
            database: Some(database),
            request_timeout: config.request_timeout,
        }
    }

    /// Create state with manually injected services and no database.
    pub fn new(auth_service: Arc<dyn AuthService>, sessions: Arc<SessionIssuer>) -> Self {
        Self {
            auth_service,
            sessions,
            database: None,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }
}

//! Ticketing Auth - authentication service for the ticketing platform
//!
//! Registers accounts, verifies credentials and issues cookie sessions.
//! The core is [`services::Authenticator`] over an
//! [`infra::AccountGateway`]; everything else is replaceable plumbing.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Accounts, credentials and the password value object
//! - **services**: Authentication and session tokens
//! - **infra**: Database, migrations and the account store
//! - **api**: HTTP handlers, extractors and routes
//! - **types**: Response envelope
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Account, AccountView, Credentials, Password, PasswordPolicy};
pub use errors::{AppError, AppResult, ErrorKind};
pub use services::{AuthService, AuthSettings, Authenticator, SessionIssuer};

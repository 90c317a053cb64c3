//! Infrastructure layer - External systems integration
//!
//! Database connection, migrations and the account store.

pub mod db;
pub mod repositories;

pub use db::{Database, MigrationState, Migrator, SchemaChange};
pub use repositories::{AccountGateway, AccountStore};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockAccountGateway;

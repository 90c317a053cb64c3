//! PostgreSQL pool and schema management for the account store.

use sea_orm::{ConnectionTrait, Database as SeaDatabase, DatabaseConnection, Statement};
use sea_orm_migration::{MigrationStatus, MigratorTrait};

use crate::errors::{AppError, AppResult};

pub mod migrations;

pub use migrations::Migrator;

/// A schema change requested by an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaChange {
    /// Apply every pending migration
    Apply,
    /// Revert the most recently applied migration
    RevertLast,
    /// Drop all tables, then apply everything from scratch
    Rebuild,
}

impl SchemaChange {
    fn op(self) -> &'static str {
        match self {
            SchemaChange::Apply => "Database.apply_migrations",
            SchemaChange::RevertLast => "Database.revert_migration",
            SchemaChange::Rebuild => "Database.rebuild_schema",
        }
    }
}

/// One known migration and whether the database has it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationState {
    pub name: String,
    pub applied: bool,
}

/// Shared handle to the account database.
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Open the pool and bring the schema up to date.
    pub async fn open(database_url: &str) -> AppResult<Self> {
        let database = Self::open_unmigrated(database_url).await?;
        database.change_schema(SchemaChange::Apply).await?;

        tracing::info!("account schema is up to date");
        Ok(database)
    }

    /// Open the pool and leave the schema alone.
    pub async fn open_unmigrated(database_url: &str) -> AppResult<Self> {
        let connection = SeaDatabase::connect(database_url)
            .await
            .map_err(|e| AppError::database("Database.open", e))?;
        Ok(Self { connection })
    }

    /// Pool handle for the account store.
    pub fn connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    pub async fn change_schema(&self, change: SchemaChange) -> AppResult<()> {
        let result = match change {
            SchemaChange::Apply => Migrator::up(&self.connection, None).await,
            SchemaChange::RevertLast => Migrator::down(&self.connection, Some(1)).await,
            SchemaChange::Rebuild => Migrator::fresh(&self.connection).await,
        };
        result.map_err(|e| AppError::database(change.op(), e))
    }

    /// Every migration the binary knows, oldest first.
    pub async fn migration_states(&self) -> AppResult<Vec<MigrationState>> {
        let migrations = Migrator::get_migration_with_status(&self.connection)
            .await
            .map_err(|e| AppError::database("Database.migration_states", e))?;

        Ok(migrations
            .iter()
            .map(|m| MigrationState {
                name: m.name().to_string(),
                applied: matches!(m.status(), MigrationStatus::Applied),
            })
            .collect())
    }

    /// Round-trip a trivial query.
    pub async fn ping(&self) -> AppResult<()> {
        let backend = self.connection.get_database_backend();
        self.connection
            .execute(Statement::from_string(backend, "SELECT 1".to_owned()))
            .await
            .map_err(|e| AppError::database("Database.ping", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_change_ops_are_distinct() {
        let ops = [
            SchemaChange::Apply.op(),
            SchemaChange::RevertLast.op(),
            SchemaChange::Rebuild.op(),
        ];
        assert!(ops.iter().all(|op| op.starts_with("Database.")));
        assert_ne!(ops[0], ops[1]);
        assert_ne!(ops[1], ops[2]);
    }
}

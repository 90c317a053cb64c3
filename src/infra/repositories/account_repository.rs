//! Account repository: the credential store gateway.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    SqlErr,
};
use uuid::Uuid;

use super::entities::account::{self, ActiveModel, Entity as AccountEntity};
use crate::domain::Account;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Persistent lookup and insert of accounts.
///
/// `find_by_email` reports a missing row as [`AppError::NotFound`];
/// `insert` reports a duplicate email as [`AppError::Conflict`]. Every
/// other failure is [`AppError::Infrastructure`]. Each call is exactly
/// one read or one write.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountGateway: Send + Sync {
    /// Find account by exact email match
    async fn find_by_email(&self, email: &str) -> AppResult<Account>;

    /// Create a new account with an already hashed password
    async fn insert(&self, email: &str, password_hash: &str) -> AppResult<Account>;
}

/// SeaORM-backed implementation of AccountGateway
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountGateway for AccountStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Account> {
        let result = AccountEntity::find()
            .filter(account::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| AppError::database("AccountStore.find_by_email", e))?;

        result.map(Account::from).ok_or(AppError::NotFound)
    }

    async fn insert(&self, email: &str, password_hash: &str) -> AppResult<Account> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| map_insert_error("AccountStore.insert", e))?;
        Ok(Account::from(model))
    }
}

/// Translate a failed insert, turning a UNIQUE violation into a conflict.
fn map_insert_error(op: &str, err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict,
        _ => AppError::database(op, err),
    }
}

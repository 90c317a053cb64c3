//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod account;

#[allow(unused_imports)]
pub use account::{ActiveModel as AccountActiveModel, Entity as AccountEntity, Model as AccountModel};

//! Domain layer - Core business entities and logic
//!
//! Accounts, the credentials used to claim them, and the password value
//! object. No infrastructure dependencies beyond the shared error type.

pub mod account;
pub mod password;

pub use account::{Account, AccountView, Credentials};
pub use password::{Password, PasswordPolicy};

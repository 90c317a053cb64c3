//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod auth_service;
mod session;

pub use auth_service::{AuthService, AuthSettings, Authenticator};
pub use session::{SessionClaims, SessionIssuer, SessionToken};

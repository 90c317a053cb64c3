//! Custom request extractors.

mod session;
mod validated_json;

pub use session::CurrentAccount;
pub use validated_json::ValidatedJson;

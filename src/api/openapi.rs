//! OpenAPI documentation configuration.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::auth_handler;
use crate::config::SESSION_COOKIE_NAME;
use crate::domain::AccountView;

/// OpenAPI documentation for the ticketing authentication service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ticketing Auth",
        version = "0.1.0",
        description = "Account registration, sign-in and cookie sessions for the ticketing platform"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::sign_up,
        auth_handler::sign_in,
        auth_handler::current_user,
        auth_handler::sign_out,
    ),
    components(
        schemas(
            AccountView,
            auth_handler::CredentialsRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Sign-up, sign-in and sessions")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for the session cookie
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE_NAME))),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_auth_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();

        assert!(paths.contains(&"/auth".to_string()));
        assert!(paths.contains(&"/auth/signup".to_string()));
        assert!(paths.contains(&"/auth/signout".to_string()));
    }
}

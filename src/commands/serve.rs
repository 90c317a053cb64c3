//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    let db = Arc::new(Database::open(&config.database_url).await?);

    let app = create_router(AppState::from_config(db, &config));

    let addr = bind_addr(&args, &config);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal("Serve.bind", format!("{}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal("Serve.run", e.to_string()))?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Listen address from the config, with CLI flags taking precedence.
fn bind_addr(args: &ServeArgs, config: &Config) -> String {
    let host = args.host.as_deref().unwrap_or(&config.server_host);
    let port = args.port.unwrap_or(config.server_port);
    format!("{}:{}", host, port)
}

/// Resolve on Ctrl-C so in-flight requests can drain.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(host: &str, port: &str) -> Config {
        let (host, port) = (host.to_string(), port.to_string());
        Config::from_lookup(move |key| match key {
            "SERVER_HOST" => Some(host.clone()),
            "SERVER_PORT" => Some(port.clone()),
            "JWT_SECRET" => Some("serve-test-secret-at-least-32-chars!".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn test_bind_addr_uses_config_without_flags() {
        let config = config_with("10.0.0.5", "9090");
        assert_eq!(bind_addr(&ServeArgs::default(), &config), "10.0.0.5:9090");
    }

    #[test]
    fn test_bind_addr_flags_override_config() {
        let config = config_with("10.0.0.5", "9090");

        let args = ServeArgs {
            host: None,
            port: Some(8081),
        };
        assert_eq!(bind_addr(&args, &config), "10.0.0.5:8081");

        let args = ServeArgs {
            host: Some("127.0.0.1".to_string()),
            port: Some(8081),
        };
        assert_eq!(bind_addr(&args, &config), "127.0.0.1:8081");
    }
}

//! Application entry point.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use secrecy::SecretString;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use aplicacao_financeira::api::create_router_with_timeout;
use aplicacao_financeira::app::AppState;
use aplicacao_financeira::domain::ConfigError;
use aplicacao_financeira::infra::{
    DEFAULT_LOCALE, MessageCatalog, PostgresClient, PostgresConfig, StaticTokenVerifier,
};

/// Application configuration
struct Config {
    database_url: String,
    host: String,
    port: u16,
    /// Locale of the message catalog used for error responses
    locale: String,
    /// `token=ROLE` pairs, comma separated
    api_tokens: SecretString,
    request_timeout: Duration,
}

impl Config {
    fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingEnv("DATABASE_URL".to_string()))?;
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_var("PORT", 3000)?;
        let locale = env::var("APP_LOCALE").unwrap_or_else(|_| DEFAULT_LOCALE.to_string());
        let api_tokens = SecretString::from(env::var("API_TOKENS").unwrap_or_default());
        let request_timeout = Duration::from_secs(parse_var("REQUEST_TIMEOUT_SECS", 30)?);

        Ok(Self {
            database_url,
            host,
            port,
            locale,
            api_tokens,
            request_timeout,
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            name: name.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug,sqlx=warn"));

    let registry = tracing_subscriber::registry().with(env_filter);
    if env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    info!("🏦 Aplicação Financeira v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    // The catalog must be complete before any request can fail
    let catalog = MessageCatalog::for_locale(&config.locale)
        .with_context(|| format!("Failed to load message catalog for {}", config.locale))?;
    catalog
        .verify()
        .context("Message catalog is missing required entries")?;
    let catalog = catalog.install();
    info!("   ✓ Message catalog loaded ({})", catalog.locale());

    let verifier = StaticTokenVerifier::from_spec(&config.api_tokens)?;
    if verifier.is_empty() {
        warn!("   ○ API_TOKENS is empty; every business route will answer 401");
    } else {
        info!("   ✓ {} access token(s) configured", verifier.len());
    }

    info!("📦 Initializing infrastructure...");

    let postgres_client =
        PostgresClient::new(&config.database_url, PostgresConfig::default()).await?;
    postgres_client.run_migrations().await?;
    info!("   ✓ Database connected and migrations applied");

    let app_state = Arc::new(AppState::new(
        Arc::new(postgres_client),
        Arc::new(verifier),
    ));

    let router = create_router_with_timeout(app_state, config.request_timeout);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🚀 Server starting on http://{}", addr);
    info!("📖 Swagger UI available at http://{}/swagger-ui", addr);
    info!("📄 OpenAPI spec at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

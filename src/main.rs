use anyhow::{Context, Result};
use locale_router::config::Config;
use locale_router::i18n::{LocaleCatalog, StaticCatalog, SysLocale, SystemLocale};
use locale_router::server::{self, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("locale_router=info".parse()?),
        )
        .init();

    info!("Starting locale router");

    // Load configuration from environment
    let config = Config::from_env()?;

    let catalog: Arc<dyn LocaleCatalog> = Arc::new(StaticCatalog::builtin());
    let system: Arc<dyn SystemLocale> = Arc::new(SysLocale);

    // Unsupported locales are a startup error, not a per-request warning
    let registry = config
        .validate(Arc::clone(&catalog), Arc::clone(&system))
        .context("Invalid locale configuration")?;
    info!(
        "Locales: {:?} (default {})",
        registry.available_locales(),
        registry.default_locale()
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(config, server::demo_routes(), catalog, system);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, server::app(state))
        .await
        .context("Server error")?;

    Ok(())
}

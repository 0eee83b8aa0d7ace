//! # vnscope-api — Binary Entry Point
//!
//! Starts the Axum HTTP server. Configuration comes from the environment;
//! see [`AppConfig::from_env`].

use std::sync::Arc;

use vnscope_api::profiles::ProfileDirectory;
use vnscope_api::state::{AppConfig, AppState};
use vnscope_boundary::{
    BoundaryProvider, HttpBoundaryProvider, HttpProviderConfig, StaticBoundaryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    // Initialize structured tracing.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    tracing::debug!(?config, "configuration loaded");
    if config.auth_secret.is_none() {
        tracing::warn!(
            "Development mode: VNSCOPE_AUTH_SECRET not set. Callers are NOT authenticated; any bearer user id is accepted."
        );
    }

    let provider = boundary_provider(&config).map_err(|e| {
        tracing::error!("Boundary provider initialization failed: {e}");
        e
    })?;

    let profiles = match &config.profiles_file {
        Some(path) => ProfileDirectory::from_file(path).map_err(|e| {
            tracing::error!("Profile directory load failed: {e}");
            e
        })?,
        None => {
            tracing::warn!(
                "VNSCOPE_PROFILES_FILE not set. Every caller will be treated as unassigned."
            );
            ProfileDirectory::new()
        }
    };

    let port = config.port;
    let state = AppState::new(config, provider, Arc::new(profiles));
    let app = vnscope_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("vnscope API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// HTTP provider when a URL is configured, else the static file, else an
/// empty set that denies every scoped geometry check.
fn boundary_provider(
    config: &AppConfig,
) -> Result<Arc<dyn BoundaryProvider>, Box<dyn std::error::Error>> {
    if let Some(base_url) = &config.boundary_url {
        tracing::info!(url = %base_url, "using HTTP boundary provider");
        let provider = HttpBoundaryProvider::new(HttpProviderConfig {
            base_url: base_url.clone(),
            api_token: config.boundary_token.clone(),
            timeout: config.fetch_timeout,
        })?;
        return Ok(Arc::new(provider));
    }
    if let Some(path) = &config.boundary_file {
        return Ok(Arc::new(StaticBoundaryProvider::from_file(path)?));
    }
    tracing::warn!(
        "No boundary source configured. Point and polygon checks for scoped users will fail with BOUNDARY_UNAVAILABLE."
    );
    Ok(Arc::new(StaticBoundaryProvider::new()))
}

use anyhow::{Context, Result};
use clientgate::application::{
    commands::authorization::AuthorizationSettings,
    ports::{flows::PendingFlowStore, time::Clock},
    services::ApplicationServices,
};
use clientgate::config::AppConfig;
use clientgate::domain::{
    client::{ClientStore, ResourceCatalog},
    consent::ConsentStore,
};
use clientgate::infrastructure::{
    clients::{build_registry, load_clients_file},
    security::{
        consent_store::InMemoryConsentStore, flow_store::InMemoryPendingFlowStore,
        redis_consent_store::RedisConsentStore, secret_hasher::build_hasher,
    },
    time::SystemClock,
};
use clientgate::presentation::http::{routes::build_router, state::HttpState};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err:#}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    let hasher = build_hasher(config.hash_algorithm())?;
    let resources = Arc::new(ResourceCatalog::standard());

    let extra_clients = match config.clients_file() {
        Some(path) => load_clients_file(path)?,
        None => Vec::new(),
    };
    let registry = build_registry(
        &config.catalog_settings(extra_clients),
        hasher.as_ref(),
        &resources,
    )
    .await?;
    let client_store: Arc<dyn ClientStore> = Arc::new(registry);

    let consent_store: Arc<dyn ConsentStore> = match config.redis_url() {
        Some(url) => {
            tracing::info!("using redis consent store");
            Arc::new(RedisConsentStore::from_url(url).context("redis consent store")?)
        }
        None => {
            tracing::info!("using in-memory consent store");
            Arc::new(InMemoryConsentStore::default())
        }
    };
    let pending_flows = Arc::new(InMemoryPendingFlowStore::new());
    let flow_store: Arc<dyn PendingFlowStore> = pending_flows.clone();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    spawn_flow_sweeper(pending_flows, Arc::clone(&clock), config.consent_prompt_ttl());

    let mut settings = AuthorizationSettings::new(config.issuer_url());
    settings.consent_prompt_ttl = config.consent_prompt_ttl();
    settings.default_consent_lifetime = config.consent_lifetime();

    let services = Arc::new(ApplicationServices::new(
        client_store,
        consent_store,
        flow_store,
        hasher,
        config.hash_timeout(),
        resources,
        clock,
        settings,
    ));

    let state = HttpState {
        services: Arc::clone(&services),
    };
    let app = build_router(state, config.allowed_origins());

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Drops unanswered consent prompts. Expired prompts are kept for one extra
/// TTL so late answers still get a consent-expired error.
fn spawn_flow_sweeper(store: Arc<InMemoryPendingFlowStore>, clock: Arc<dyn Clock>, ttl: Duration) {
    let Ok(max_age) = chrono::Duration::from_std(ttl.saturating_mul(2)) else {
        return;
    };
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(ttl.max(Duration::from_secs(1)));
        loop {
            ticker.tick().await;
            let Some(cutoff) = clock.now().checked_sub_signed(max_age) else {
                continue;
            };
            let purged = store.purge_created_before(cutoff);
            if purged > 0 {
                tracing::debug!(purged, "expired consent prompts removed");
            }
        }
    });
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install terminate handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}

mod api;
mod app;
mod auth;
mod config;
mod dto;
mod error;
mod middleware;
mod state;

use std::time::{Duration, Instant};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cravemod_web=debug,cravemod_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::load()?;
    let bind_addr = config.bind_addr;
    let tls_config = config.tls.clone();

    let state = AppState::new(config)?;
    let limits = state.login_limiter.config();
    tracing::info!(
        "Login limiter: {} attempts per {}s window",
        limits.max_attempts(),
        limits.window().as_secs()
    );

    // Drop limiter keys whose attempts have all aged out
    let cleanup_limiter = state.login_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            let removed = cleanup_limiter.purge_expired(Instant::now());
            if removed > 0 {
                tracing::debug!("Purged {removed} idle login limiter entries");
            }
        }
    });

    let app = app::build_router(state);

    if let (Some(cert), Some(key)) = (&tls_config.cert_path, &tls_config.key_path) {
        use axum_server::tls_rustls::RustlsConfig;
        let rustls_config = RustlsConfig::from_pem_file(cert, key).await?;
        tracing::info!("cravemod-web listening on https://{}", bind_addr);
        axum_server::bind_rustls(bind_addr, rustls_config)
            .serve(app.into_make_service())
            .await?;
    } else {
        let listener = tokio::net::TcpListener::bind(bind_addr).await?;
        tracing::info!("cravemod-web listening on http://{}", bind_addr);
        axum::serve(listener, app).await?;
    }

    Ok(())
}

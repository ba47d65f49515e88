mod html;
mod middleware;
mod session;
mod web;

use std::sync::Arc;

use hpba_client::{AnalyzerClient, IdentityClient};
use tracing_subscriber::EnvFilter;

use crate::web::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(hpba_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let analyzer = AnalyzerClient::new(&config)?;
    let identity = IdentityClient::new(&config)?;
    tracing::info!(
        env = %config.env,
        api_url = %config.api_url,
        allowed_domain = %config.allowed_domain,
        "starting dashboard server"
    );

    let bind_addr = config.bind_addr;
    let app = build_app(AppState::new(config, analyzer, identity));

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(%bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}

use std::sync::Arc;

use anyhow::Context;

use foodgram_api::app::{build_app, AppServices};
use foodgram_api::{seed, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    foodgram_observability::init();

    let config = Config::from_env().context("invalid configuration")?;

    let services = match &config.database_url {
        Some(url) => {
            tracing::info!("using Postgres stores");
            AppServices::postgres(url)
                .await
                .context("failed to initialise Postgres stores")?
        }
        None => {
            tracing::info!("using in-memory stores");
            AppServices::in_memory()
        }
    };

    if let Some(path) = &config.seed_path {
        let data = seed::load_file(path).with_context(|| format!("failed to load seed {}", path.display()))?;
        seed::apply(&services, data).await.context("failed to apply seed")?;
    }

    let app = build_app(config.jwt_secret.clone(), Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

use envconfig::Envconfig;
use eyre::{Result, WrapErr};
use tokio::signal;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use resource_api::config::Config;
use resource_api::server::serve;

async fn shutdown() {
    let mut term = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(term) => term,
        Err(e) => {
            tracing::error!("failed to register SIGTERM handler: {}", e);
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!("failed to listen for SIGINT: {}", e);
            }
            return;
        }
    };

    let mut interrupt = match signal::unix::signal(signal::unix::SignalKind::interrupt()) {
        Ok(interrupt) => interrupt,
        Err(e) => {
            tracing::error!("failed to register SIGINT handler: {}", e);
            term.recv().await;
            return;
        }
    };

    tokio::select! {
        _ = term.recv() => {},
        _ = interrupt.recv() => {},
    };

    tracing::info!("Shutting down gracefully...");
}

fn init_logging(debug: bool) {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let log_layer = {
        let base_layer = fmt::layer().with_target(true).with_level(true);

        if debug {
            base_layer.with_ansi(true).with_filter(filter()).boxed()
        } else {
            base_layer.json().with_filter(filter()).boxed()
        }
    };

    tracing_subscriber::registry().with(log_layer).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::init_from_env().wrap_err("invalid configuration")?;

    init_logging(config.debug);

    let listener = tokio::net::TcpListener::bind(config.bind())
        .await
        .wrap_err_with(|| format!("could not bind {}", config.bind()))?;

    serve(config, listener, shutdown()).await
}

use std::future::Future;

use eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::prometheus::setup_metrics_recorder;
use crate::router;
use crate::service::ResourceService;
use crate::store::{PgResourceStore, ResourceStoreHandle};

/// Connect to PostgreSQL, then serve until `shutdown` resolves.
pub async fn serve<F>(config: Config, listener: TcpListener, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!(state = "starting", "connecting to the resource store");
    let store = PgResourceStore::connect(&config)
        .await
        .wrap_err("failed to connect to the resource store")?;

    serve_with_store(
        std::sync::Arc::new(store),
        listener,
        shutdown,
        config.export_prometheus,
    )
    .await
}

/// Serve the API over an already connected store.
///
/// Once `shutdown` resolves the listener stops accepting, in-flight requests are
/// allowed to finish, and only then is the store closed.
pub async fn serve_with_store<F>(
    store: ResourceStoreHandle,
    listener: TcpListener,
    shutdown: F,
    export_prometheus: bool,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics = if export_prometheus {
        Some(setup_metrics_recorder().wrap_err("failed to install metrics recorder")?)
    } else {
        None
    };

    let app = router::router(ResourceService::new(store.clone()), metrics);

    info!(state = "listening", "listening on {:?}", listener.local_addr()?);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            info!(state = "draining", "waiting for in-flight requests");
        })
        .await;

    store.close().await;
    info!(state = "stopped", "resource store closed");

    served.wrap_err("http server failed")
}

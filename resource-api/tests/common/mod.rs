use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use resource_api::server::serve_with_store;
use resource_api::store::ResourceStoreHandle;

pub struct ServerHandle {
    pub addr: SocketAddr,
    shutdown: Arc<Notify>,
    task: Option<JoinHandle<eyre::Result<()>>>,
}

impl ServerHandle {
    pub async fn for_store(store: ResourceStoreHandle) -> ServerHandle {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let notify = Arc::new(Notify::new());
        let shutdown = notify.clone();

        let task = tokio::spawn(async move {
            serve_with_store(store, listener, async move { notify.notified().await }, false).await
        });

        ServerHandle {
            addr,
            shutdown,
            task: Some(task),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{:?}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        reqwest::Client::new()
            .get(self.url(path))
            .send()
            .await
            .expect("failed to send request")
    }

    pub fn begin_shutdown(&self) {
        self.shutdown.notify_one()
    }

    /// Trigger shutdown and wait for the server task to finish.
    pub async fn stop(mut self) -> anyhow::Result<()> {
        self.begin_shutdown();
        let task = self.task.take().expect("server already stopped");
        task.await?.map_err(|e| anyhow::anyhow!("server exited with an error: {e:?}"))
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.shutdown.notify_one()
    }
}

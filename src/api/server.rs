//! HTTP server lifecycle: serve the API router on a bound listener until
//! the shutdown future resolves.

use std::future::Future;

use tokio::net::TcpListener;

use crate::api::router::api_router;
use crate::api::types::ApiContext;

/// Serve the API on `listener` until `shutdown` completes.
pub async fn serve<F>(listener: TcpListener, ctx: ApiContext, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    let app = api_router(ctx);

    tracing::info!(%addr, "API server started");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    tracing::info!("API server stopped");

    Ok(())
}

/// Resolves on Ctrl-C.
pub async fn ctrl_c_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("API server received shutdown signal");
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use tokio::sync::oneshot;

    use super::*;
    use crate::pipeline::contradiction::{ContradictionChecker, MockLlmClient};

    #[tokio::test]
    async fn start_and_stop_server() {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        let ctx = ApiContext::new(ContradictionChecker::new(Box::new(MockLlmClient::new("[]"))));

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve(listener, ctx, async move {
            let _ = shutdown_rx.await;
        }));

        let url = format!("http://{addr}/");
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), 200);
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["status"], "ok");

        shutdown_tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }
}

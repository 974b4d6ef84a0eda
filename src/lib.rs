pub mod api;
pub mod config;
pub mod pipeline;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::api::ApiContext;
use crate::config::AppConfig;
use crate::pipeline::contradiction::{ContradictionChecker, GeminiClient};

/// Initialize tracing. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Build the checker from configuration and serve the API until Ctrl-C.
///
/// Must be called outside any async runtime: the Gemini client is blocking
/// and owns its own connection pool.
pub fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        model = %config.model,
        bind_addr = %config.bind_addr,
        timeout_secs = ?config.request_timeout.map(|t| t.as_secs()),
        "{} starting v{}",
        config::APP_NAME,
        config::APP_VERSION
    );

    let client = GeminiClient::from_config(&config)?;
    let ctx = ApiContext::new(ContradictionChecker::new(Box::new(client)));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let serve_ctx = ctx.clone();
    runtime.block_on(async move {
        let listener = TcpListener::bind(config.bind_addr).await?;
        api::serve(listener, serve_ctx, api::server::ctrl_c_signal()).await
    })?;
    // Last checker handle, released outside the runtime.
    drop(ctx);

    Ok(())
}

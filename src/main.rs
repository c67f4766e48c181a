use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use codesmith_backend::core::config::AppPaths;
use codesmith_backend::core::logging;
use codesmith_backend::server::router::router;
use codesmith_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let paths = Arc::new(AppPaths::new());
    logging::init(&paths);

    let state = AppState::initialize(paths);

    let bind_addr = format!("127.0.0.1:{}", state.settings.server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    let addr = listener.local_addr()?;

    tracing::info!("Listening on {}", addr);

    let app = router(state);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

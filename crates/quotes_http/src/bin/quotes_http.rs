#![forbid(unsafe_code)]

use log::{error, info};
use quotes_core::{core_version, init_logging, Evictor, QuoteStore};
use quotes_http::{router, ServerConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    let log_dir = config.log_dir.to_string_lossy().into_owned();
    init_logging(&config.log_level, &log_dir)?;

    let store = Arc::new(QuoteStore::new());
    store.seed(config.seed_count);
    let _evictor = Evictor::new(store.clone(), config.evictor).spawn();

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(
        "event=server_listen module=http status=ok addr={} version={}",
        listener.local_addr()?,
        core_version()
    );
    println!("quotes_http listening on http://{}", config.bind);

    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=http status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=signal_listen module=http status=error error={err}");
        std::future::pending::<()>().await;
    }
}

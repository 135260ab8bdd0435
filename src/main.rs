use chrono::Local;
use merit_ledger::{calendar::day_of, router, sample::seed_ledger, AppConfig, AppState, Ledger};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = AppConfig::from_env();
    let ledger = if config.seed_sample {
        let ledger = seed_ledger(day_of(&Local::now()))?;
        info!(entries = ledger.len(), "seeded sample records");
        ledger
    } else {
        Ledger::new()
    };

    let app = router(AppState::new(ledger));
    let addr = config.addr();

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

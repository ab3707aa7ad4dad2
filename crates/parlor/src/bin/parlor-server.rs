//! Parlor room broker server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin parlor-server
//! PORT=8080 RUST_LOG=debug cargo run --bin parlor-server
//! ```

use parlor::{ParlorServer, ServerConfig, logging::init_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    init_tracing(env!("CARGO_BIN_NAME"), &config.log_level);

    let server = ParlorServer::builder()
        .bind(&config.listen_addr.to_string())
        .registry_config(config.registry)
        .build()
        .await?;

    tracing::info!(port = config.listen_addr.port(), "server running");

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutdown signal received");
        })
        .await?;

    Ok(())
}

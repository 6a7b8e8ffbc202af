//! Bid Client Binary
//!
//! Connects to the live price feed, prints every price update and submits
//! bids read from stdin.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin bid-client
//! # then type bids, one per line:
//! 42 19.99
//! ```
//!
//! # Environment Variables
//!
//! - `BID_CLIENT_WS_URL`: Live feed endpoint (default: ws://localhost:4567/precios)
//! - `BID_CLIENT_API_BASE_URL`: Price API base URL (default: <http://localhost:4567>)
//! - `BID_CLIENT_RECONNECT_DELAY_MS`: Fixed reconnect delay (default: 3000)
//! - `BID_CLIENT_HTTP_TIMEOUT_SECS`: Price API timeout (default: 30)
//! - `BID_CLIENT_BODY_FORMAT`: raw | json (default: raw)
//! - `BID_CLIENT_METRICS_PORT`: Prometheus metrics port (default: 0 = disabled)
//! - `OTEL_ENABLED`: Export spans over OTLP (default: false)
//! - `RUST_LOG`: Log filter (default: bid_client=info)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use bid_client::infrastructure::telemetry;
use bid_client::{
    BidSubmitter, ClientConfig, ConnectionConfig, ConnectionManager, ConsoleSink, PriceApiClient,
    PriceFeed, PriceUpdatePort, SubmissionResult, init_metrics,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        eprintln!("rustls crypto provider already installed");
    }

    load_dotenv_from_ancestors();

    let telemetry_guard = telemetry::init();

    tracing::info!(
        span_export = telemetry_guard.is_exporting(),
        "Starting bid client"
    );

    let config = ClientConfig::from_env().context("invalid configuration")?;
    log_config(&config);

    if config.metrics_port != 0 {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
        init_metrics(addr).context("failed to start metrics exporter")?;
    }

    let manager = Arc::new(ConnectionManager::new(
        ConnectionConfig::with_reconnect_delay(config.feed.reconnect_delay),
    ));
    let feed = Arc::new(PriceFeed::new(Arc::new(ConsoleSink::stdout())));
    manager
        .start(&config.feed.ws_url, feed)
        .context("failed to start price feed")?;

    let api = PriceApiClient::new(
        &config.api.base_url,
        config.api.timeout,
        config.api.body_format,
    )
    .context("failed to build price API client")?;
    let submitter = BidSubmitter::new(api);

    tokio::select! {
        () = read_bids(&submitter, manager.as_ref()) => {}
        () = await_shutdown() => {}
    }

    manager.stop().await;

    tracing::info!("Bid client stopped");
    Ok(())
}

/// Submit every `ITEM_ID PRICE` line from stdin, then keep the feed
/// running until shutdown.
async fn read_bids<P: PriceUpdatePort>(submitter: &BidSubmitter<P>, manager: &ConnectionManager) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let Some((item_id, price)) = line.split_once(char::is_whitespace) else {
                    eprintln!("usage: ITEM_ID PRICE");
                    continue;
                };
                let result =
                    SubmissionResult::from(submitter.submit(item_id, price.trim(), manager).await);
                print_result(item_id, &result);
            }
            Ok(None) => {
                tracing::debug!("stdin closed, no more bids");
                break;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stdin, no more bids");
                break;
            }
        }
    }

    std::future::pending::<()>().await;
}

fn print_result(item_id: &str, result: &SubmissionResult) {
    match (result.ok, result.message.as_deref()) {
        (true, None) => println!("bid on {item_id}: ok"),
        (true, Some(warning)) => println!("bid on {item_id}: ok ({warning})"),
        (false, message) => println!(
            "bid on {item_id}: failed: {}",
            message.unwrap_or("unknown error")
        ),
    }
}

/// Log the parsed configuration.
fn log_config(config: &ClientConfig) {
    tracing::info!(
        ws_url = %config.feed.ws_url,
        api_base_url = %config.api.base_url,
        reconnect_delay_ms = config.feed.reconnect_delay.as_millis(),
        body_format = config.api.body_format.as_str(),
        metrics_port = config.metrics_port,
        "Configuration loaded"
    );
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv_from_ancestors() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
async fn await_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}

use anyhow::{Result, anyhow};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{self, EnvFilter};

use kava_worker::indexer::rpc::{LcdClient, Rpc, RpcClient};
use kava_worker::metrics::{Metrics, MetricsSink, NoopMetrics};
use kava_worker::models::common::HeightHash;
use kava_worker::utils::load_config;
use kava_worker::utils::rate_limiter::RateLimiter;
use kava_worker::utils::retry::{RetryConfig, retry};
use kava_worker::worker::{ClientSettings, IndexerClient, http};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    println!();
    info!("=========================== INITIALIZING ===========================");

    // Load config
    let config = match load_config("config.yml") {
        Ok(config) => {
            info!("Config loaded successfully");
            config
        }
        Err(e) => {
            error!("Failed to load config: {:#}", e);
            return Err(anyhow!(e));
        }
    };

    // Initialize optional metrics
    let metrics: Arc<dyn MetricsSink> = if config.metrics.enabled {
        let metrics = Metrics::new(config.chain_name.clone())?;
        metrics
            .start_metrics_server(&config.metrics.address, config.metrics.port)
            .await?;
        Arc::new(metrics)
    } else {
        info!("Metrics are disabled");
        Arc::new(NoopMetrics)
    };

    // RPC and LCD share one token bucket
    let limiter = Arc::new(RateLimiter::new(config.requests_per_second));
    let rpc = Arc::new(RpcClient::new(&config, limiter.clone(), metrics.clone())?);
    let lcd = Arc::new(LcdClient::new(&config, limiter, metrics.clone())?);

    // Make sure the node answers before accepting tasks
    let latest = retry(
        || rpc.get_block(HeightHash::default()),
        &RetryConfig::default(),
        "get latest block",
    )
    .await?;
    info!(height = latest.height, chain_id = %latest.chain_id, "Node reachable");
    if !config.chain_id.is_empty() && latest.chain_id != config.chain_id {
        warn!(
            expected = %config.chain_id,
            received = %latest.chain_id,
            "Node reports a different chain id"
        );
    }

    let client = Arc::new(IndexerClient::new(
        rpc,
        lcd,
        ClientSettings::from(&config),
        metrics,
    ));

    println!();
    info!("========================== STARTING WORKER ==========================");

    let router = http::router(client);
    tokio::select! {
        result = http::serve(router, &config.server.address, config.server.port) => result,
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C signal, shutting down...");
            Ok(())
        }
    }
}

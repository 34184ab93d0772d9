use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use http::StatusCode;
use opentelemetry::KeyValue;
use opentelemetry::metrics::{Counter, Histogram, MeterProvider};
use opentelemetry_sdk::metrics::{MetricError, SdkMeterProvider};
use prometheus::{Encoder, TextEncoder};
use std::net::SocketAddr;

/// Everything the worker reports about itself.
///
/// Components receive this as an injected `Arc<dyn MetricsSink>` so that the
/// conversion core never touches process-wide state. Every hook defaults to a no-op.
pub trait MetricsSink: Send + Sync {
    fn unknown_message(&self, _route: &str, _action: &str) {}
    fn broken_message(&self, _route: &str, _action: &str) {}
    fn transaction_converted(&self, _elapsed: Duration) {}
    fn rpc_request(&self, _endpoint: &str, _elapsed: Duration, _success: bool) {}
    fn block_cache(&self, _hit: bool) {}
    fn task_received(&self, _kind: &str) {}
    fn response_sent(&self, _kind: &str) {}
    fn stream_registered(&self) {}
}

/// Sink used when metrics are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {}

pub struct Metrics {
    registry: Arc<prometheus::Registry>,
    _provider: SdkMeterProvider,
    pub chain_name: String,

    // Conversion metrics
    pub unknown_messages: Counter<u64>,
    pub broken_messages: Counter<u64>,
    pub transactions_converted: Counter<u64>,
    pub conversion_duration: Histogram<f64>,

    // RPC metrics
    pub rpc_requests: Counter<u64>,
    pub rpc_errors: Counter<u64>,
    pub rpc_latency: Histogram<f64>,
    pub block_cache: Counter<u64>,

    // Task protocol metrics
    pub tasks_received: Counter<u64>,
    pub responses_sent: Counter<u64>,
    pub streams_registered: Counter<u64>,
}

impl Metrics {
    pub fn new(chain_name: String) -> Result<Self, MetricError> {
        let registry = prometheus::Registry::new();

        let exporter = opentelemetry_prometheus::exporter()
            .with_registry(registry.clone())
            .build()?;

        let provider = SdkMeterProvider::builder().with_reader(exporter).build();
        let meter = provider.meter("worker_metrics");

        let unknown_messages = meter
            .u64_counter("worker_unknown_messages")
            .with_description("Messages whose type has no registered mapper")
            .build();

        let broken_messages = meter
            .u64_counter("worker_broken_messages")
            .with_description("Known messages that failed to decode or map")
            .build();

        let transactions_converted = meter
            .u64_counter("worker_transactions_converted")
            .with_description("Transactions assembled from raw node responses")
            .build();

        let conversion_duration = meter
            .f64_histogram("worker_transaction_conversion_duration")
            .with_description("Time spent assembling a single transaction")
            .with_boundaries(vec![
                0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1,
            ])
            .with_unit("s")
            .build();

        let rpc_requests = meter
            .u64_counter("worker_rpc_requests")
            .with_description("Number of requests made to the node")
            .build();

        let rpc_errors = meter
            .u64_counter("worker_rpc_errors")
            .with_description("Number of node requests that failed")
            .build();

        let rpc_latency = meter
            .f64_histogram("worker_rpc_latency")
            .with_description("Node request latency")
            .with_boundaries(vec![
                0.025, 0.05, 0.075, 0.1, 0.15, 0.2, 0.3, 0.5, 1.0, 5.0, 10.0,
            ])
            .with_unit("s")
            .build();

        let block_cache = meter
            .u64_counter("worker_block_cache_lookups")
            .with_description("Block cache lookups by outcome")
            .build();

        let tasks_received = meter
            .u64_counter("worker_tasks_received")
            .with_description("Task requests received from the manager")
            .build();

        let responses_sent = meter
            .u64_counter("worker_responses_sent")
            .with_description("Task responses sent to the manager")
            .build();

        let streams_registered = meter
            .u64_counter("worker_streams_registered")
            .with_description("Streams registered by the manager")
            .build();

        Ok(Self {
            registry: Arc::new(registry),
            _provider: provider,
            chain_name,
            unknown_messages,
            broken_messages,
            transactions_converted,
            conversion_duration,
            rpc_requests,
            rpc_errors,
            rpc_latency,
            block_cache,
            tasks_received,
            responses_sent,
            streams_registered,
        })
    }

    fn chain(&self) -> KeyValue {
        KeyValue::new("chain", self.chain_name.clone())
    }

    pub fn router(&self) -> Router {
        let registry = self.registry.clone();
        Router::new().route("/metrics", get(move || metrics_handler(registry.clone())))
    }

    pub async fn start_metrics_server(&self, addr: &str, port: u16) -> Result<()> {
        let addr = format!("{addr}:{port}")
            .parse::<SocketAddr>()
            .context("invalid metrics address")?;
        let app = self.router();

        // Only used for logging.
        let access_url = if addr.ip().to_string() == "0.0.0.0" {
            format!("http://localhost:{port}/metrics")
        } else {
            format!("http://{}:{port}/metrics", addr.ip())
        };

        info!(
            "Starting metrics server - binding to {} (accessible at {})",
            addr, access_url
        );

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .context("failed to bind metrics listener")?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Metrics server stopped: {}", e);
            }
        });
        Ok(())
    }
}

impl MetricsSink for Metrics {
    fn unknown_message(&self, route: &str, action: &str) {
        self.unknown_messages.add(
            1,
            &[
                self.chain(),
                KeyValue::new("route", route.to_string()),
                KeyValue::new("action", action.to_string()),
            ],
        );
    }

    fn broken_message(&self, route: &str, action: &str) {
        self.broken_messages.add(
            1,
            &[
                self.chain(),
                KeyValue::new("route", route.to_string()),
                KeyValue::new("action", action.to_string()),
            ],
        );
    }

    fn transaction_converted(&self, elapsed: Duration) {
        self.transactions_converted.add(1, &[self.chain()]);
        self.conversion_duration
            .record(elapsed.as_secs_f64(), &[self.chain()]);
    }

    fn rpc_request(&self, endpoint: &str, elapsed: Duration, success: bool) {
        let labels = [self.chain(), KeyValue::new("endpoint", endpoint.to_string())];
        self.rpc_requests.add(1, &labels);
        self.rpc_latency.record(elapsed.as_secs_f64(), &labels);
        if !success {
            self.rpc_errors.add(1, &labels);
        }
    }

    fn block_cache(&self, hit: bool) {
        let outcome = if hit { "hit" } else { "miss" };
        self.block_cache
            .add(1, &[self.chain(), KeyValue::new("outcome", outcome)]);
    }

    fn task_received(&self, kind: &str) {
        self.tasks_received
            .add(1, &[self.chain(), KeyValue::new("type", kind.to_string())]);
    }

    fn response_sent(&self, kind: &str) {
        self.responses_sent
            .add(1, &[self.chain(), KeyValue::new("type", kind.to_string())]);
    }

    fn stream_registered(&self) {
        self.streams_registered.add(1, &[self.chain()]);
    }
}

async fn metrics_handler(registry: Arc<prometheus::Registry>) -> Result<String, StatusCode> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = vec![];
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    String::from_utf8(buffer).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_records_into_registry() {
        let metrics = Metrics::new("kava".to_string()).unwrap();
        metrics.unknown_message("swap", "swap_exact_for_tokens");
        metrics.rpc_request("/tx_search", Duration::from_millis(20), false);

        let families = metrics.registry.gather();
        let names: Vec<&str> = families.iter().map(|f| f.get_name()).collect();
        assert!(names.iter().any(|n| n.starts_with("worker_unknown_messages")));
        assert!(names.iter().any(|n| n.starts_with("worker_rpc_errors")));
    }
}

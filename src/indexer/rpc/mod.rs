pub mod blocks;
pub mod cache;
pub mod rewards;
pub mod transactions;

use http::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use crate::indexer::rpc::cache::BlockCache;
use crate::metrics::MetricsSink;
use crate::models::common::{Block, BlocksMap, Config, HeightAccount, HeightHash, HeightRange};
use crate::models::errors::RpcError;
use crate::models::rpc::RpcResponse;
use crate::models::tasks::GetRewardResponse;
use crate::models::transactions::Transaction;
use crate::utils::rate_limiter::RateLimiter;
use crate::utils::strip_html;

/// Tendermint RPC operations the worker depends on.
pub trait Rpc: Send + Sync {
    /// Height zero means the latest block.
    fn get_block(&self, params: HeightHash) -> impl Future<Output = Result<Block, RpcError>> + Send;

    /// Adds the metadata of every block in `range` to `acc`.
    fn get_blocks_meta(
        &self,
        range: HeightRange,
        acc: &Mutex<BlocksMap>,
    ) -> impl Future<Output = Result<(), RpcError>> + Send;

    fn search_tx(
        &self,
        range: HeightRange,
        blocks: &HashMap<u64, Block>,
        page: u64,
        per_page: u64,
    ) -> impl Future<Output = Result<Vec<Transaction>, RpcError>> + Send;
}

/// Cosmos LCD (REST) operations.
pub trait Lcd: Send + Sync {
    fn get_reward(
        &self,
        params: HeightAccount,
    ) -> impl Future<Output = Result<GetRewardResponse, RpcError>> + Send;
}

//////////////////////////////////////// Transport ////////////////////////////////////////

/// Rate limited JSON-over-HTTP access to one node endpoint.
pub struct HttpTransport {
    client: reqwest::Client,
    base: Url,
    key: Option<String>,
    limiter: Arc<RateLimiter>,
    metrics: Arc<dyn MetricsSink>,
}

impl HttpTransport {
    pub fn new(
        base: &str,
        key: Option<String>,
        timeout: Duration,
        limiter: Arc<RateLimiter>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Result<Self, RpcError> {
        let mut base = Url::parse(base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base,
            key: key.filter(|k| !k.is_empty()),
            limiter,
            metrics,
        })
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, RpcError> {
        let url = self.base.join(path.trim_start_matches('/'))?;

        self.limiter.acquire().await;
        let started = Instant::now();

        let result = self.send(url, query).await;
        self.metrics
            .rpc_request(endpoint, started.elapsed(), result.is_ok());

        let body = result?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn send(&self, url: Url, query: &[(&str, String)]) -> Result<String, RpcError> {
        debug!(url = %url, "Requesting node");
        let mut request = self.client.get(url).query(query);
        if let Some(key) = &self.key {
            request = request.header(AUTHORIZATION, key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.as_u16() > 399 {
            return Err(RpcError::Status {
                status: status.as_u16(),
                body: strip_html(&body),
            });
        }
        Ok(body)
    }
}

/// Unwraps a JSON-RPC envelope, turning `error.message` into a query failure.
pub fn into_result<T>(response: RpcResponse<T>, endpoint: &'static str) -> Result<T, RpcError> {
    if let Some(error) = response.error.filter(|e| !e.message.is_empty()) {
        let message = if error.data.is_empty() {
            error.message
        } else {
            format!("{}: {}", error.message, error.data)
        };
        return Err(RpcError::Query { endpoint, message });
    }
    response.result.ok_or(RpcError::MissingResult { endpoint })
}

////////////////////////////////////////// Clients //////////////////////////////////////////

pub struct RpcClient {
    transport: HttpTransport,
    cache: BlockCache,
    metrics: Arc<dyn MetricsSink>,
}

impl RpcClient {
    pub fn new(
        config: &Config,
        limiter: Arc<RateLimiter>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Result<Self, RpcError> {
        let transport = HttpTransport::new(
            &config.rpc_url,
            config.datahub_key.clone(),
            Duration::from_secs(config.request_timeout_secs),
            limiter,
            metrics.clone(),
        )?;

        Ok(Self {
            transport,
            cache: BlockCache::new(config.block_cache_capacity),
            metrics,
        })
    }
}

impl Rpc for RpcClient {
    async fn get_block(&self, params: HeightHash) -> Result<Block, RpcError> {
        self.fetch_block(params).await
    }

    async fn get_blocks_meta(
        &self,
        range: HeightRange,
        acc: &Mutex<BlocksMap>,
    ) -> Result<(), RpcError> {
        self.fetch_blocks_meta(range, acc).await
    }

    async fn search_tx(
        &self,
        range: HeightRange,
        blocks: &HashMap<u64, Block>,
        page: u64,
        per_page: u64,
    ) -> Result<Vec<Transaction>, RpcError> {
        self.fetch_transactions(range, blocks, page, per_page).await
    }
}

pub struct LcdClient {
    transport: HttpTransport,
}

impl LcdClient {
    pub fn new(
        config: &Config,
        limiter: Arc<RateLimiter>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Result<Self, RpcError> {
        let transport = HttpTransport::new(
            &config.lcd_url,
            config.datahub_key.clone(),
            Duration::from_secs(config.request_timeout_secs),
            limiter,
            metrics,
        )?;
        Ok(Self { transport })
    }
}

impl Lcd for LcdClient {
    async fn get_reward(&self, params: HeightAccount) -> Result<GetRewardResponse, RpcError> {
        self.fetch_reward(params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::NoopMetrics;
    use crate::models::rpc::ResponseError;

    #[test]
    fn test_base_url_keeps_path() {
        let transport = HttpTransport::new(
            "https://kava.example.com/apikey/abc",
            Some(String::new()),
            Duration::from_secs(1),
            Arc::new(RateLimiter::new(1)),
            Arc::new(NoopMetrics),
        )
        .unwrap();

        assert!(transport.key.is_none());
        assert_eq!(
            transport.base.join("tx_search").unwrap().as_str(),
            "https://kava.example.com/apikey/abc/tx_search"
        );
    }

    #[test]
    fn test_envelope_error_message() {
        let response: RpcResponse<u64> = RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(ResponseError {
                code: -32603,
                message: "Internal error".to_string(),
                data: "height 99 must be less than or equal to the current blockchain height 10"
                    .to_string(),
            }),
        };
        let err = into_result(response, "/block").unwrap_err();
        assert!(matches!(err, RpcError::Query { endpoint: "/block", .. }));

        let missing: RpcResponse<u64> = RpcResponse {
            jsonrpc: String::new(),
            result: None,
            error: None,
        };
        assert!(matches!(
            into_result(missing, "/block"),
            Err(RpcError::MissingResult { .. })
        ));
    }
}

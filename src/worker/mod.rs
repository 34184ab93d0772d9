pub mod http;
pub mod range;
pub mod stream;

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::indexer::rpc::{Lcd, Rpc};
use crate::metrics::MetricsSink;
use crate::models::common::{
    Config, HeightAccount, HeightHash, HeightRange, LatestDataRequest, LatestDataResponse,
};
use crate::models::errors::WorkerError;
use crate::models::tasks::{OutResp, RequestKind, TaskRequest, TaskResponse};
use crate::worker::range::{PAGE, get_range, get_starting_height};
use crate::worker::stream::{StreamAccess, cancelled, send_resp};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub big_page: u64,
    pub maximum_heights_to_get: u64,
    pub workers_per_stream: usize,
    pub task_timeout: Duration,
}

impl From<&Config> for ClientSettings {
    fn from(config: &Config) -> Self {
        Self {
            big_page: config.big_page.max(1),
            maximum_heights_to_get: config.maximum_heights_to_get,
            workers_per_stream: config.workers_per_stream.max(1),
            task_timeout: Duration::from_secs(config.task_timeout_secs),
        }
    }
}

/// Serves task requests arriving on registered streams.
pub struct IndexerClient<R, L> {
    rpc: Arc<R>,
    lcd: Arc<L>,
    metrics: Arc<dyn MetricsSink>,
    streams: Mutex<HashMap<String, Arc<StreamAccess>>>,
    settings: ClientSettings,
}

impl<R, L> IndexerClient<R, L>
where
    R: Rpc + 'static,
    L: Lcd + 'static,
{
    pub fn new(rpc: Arc<R>, lcd: Arc<L>, settings: ClientSettings, metrics: Arc<dyn MetricsSink>) -> Self {
        Self {
            rpc,
            lcd,
            metrics,
            streams: Mutex::new(HashMap::new()),
            settings,
        }
    }

    /// Adds a stream and starts its fixed pool of workers.
    pub async fn register_stream(self: &Arc<Self>, stream: Arc<StreamAccess>) {
        debug!(stream_id = %stream.stream_id, "Register Stream");
        self.metrics.stream_registered();

        self.streams
            .lock()
            .await
            .insert(stream.stream_id.clone(), stream.clone());

        for _ in 0..self.settings.workers_per_stream {
            let client = Arc::clone(self);
            let stream = Arc::clone(&stream);
            tokio::spawn(async move { client.run(stream).await });
        }
    }

    /// Removes a stream and stops its workers once their current task ends.
    pub async fn close_stream(&self, stream_id: &str) {
        debug!(stream_id, "Close Stream");
        if let Some(stream) = self.streams.lock().await.remove(stream_id) {
            stream.finish();
        }
    }

    pub async fn stream_count(&self) -> usize {
        self.streams.lock().await.len()
    }

    /// Worker loop: takes tasks off the stream until it is finished or its sender is gone.
    pub async fn run(&self, stream: Arc<StreamAccess>) {
        let mut finished = stream.finished();
        loop {
            tokio::select! {
                _ = cancelled(&mut finished) => return,
                request = stream.next_request() => match request {
                    Some(request) => self.handle(request, &stream).await,
                    None => {
                        self.streams.lock().await.remove(&stream.stream_id);
                        return;
                    }
                },
            }
        }
    }

    /// Runs one task to completion under the task timeout.
    pub async fn handle(&self, request: TaskRequest, stream: &StreamAccess) {
        self.metrics.task_received(&request.kind);
        let id = request.id.clone();
        let started = Instant::now();

        let outcome =
            tokio::time::timeout(self.settings.task_timeout, self.dispatch(request, stream)).await;

        match outcome {
            Ok(()) => debug!(task_id = %id, elapsed_ms = started.elapsed().as_millis() as u64, "Task done"),
            Err(_) => {
                warn!(task_id = %id, "Task timed out");
                send_error(stream, &id, format!("task timed out after {:?}", self.settings.task_timeout));
            }
        }
    }

    async fn dispatch(&self, request: TaskRequest, stream: &StreamAccess) {
        match request.request_kind() {
            RequestKind::GetTransactions => self.get_transactions(&request, stream).await,
            RequestKind::GetLatestData => self.get_latest(&request, stream).await,
            RequestKind::GetLatestMark => self.get_latest_mark(&request, stream).await,
            RequestKind::GetBlock => self.get_block(&request, stream).await,
            RequestKind::GetReward => self.get_reward(&request, stream).await,
            RequestKind::Unknown(kind) => {
                send_error(stream, &request.id, format!("There is no such handler {kind}"));
            }
        }
    }

    ////////////////////////////////////////// Handlers //////////////////////////////////////////

    /// Streams blocks and transactions for a height range, `big_page` heights at a time.
    pub async fn get_transactions(&self, request: &TaskRequest, stream: &StreamAccess) {
        let range: HeightRange = match decode_payload(request) {
            Ok(range) => range,
            Err(e) => {
                debug!(task_id = %request.id, contents = %request.payload, "Cannot unmarshal payload");
                send_error(stream, &request.id, e.to_string());
                return;
            }
        };

        if range.end_height == 0 {
            send_error(stream, &request.id, WorkerError::EndHeightZero.to_string());
            return;
        }

        self.stream_ranges(&request.id, range.chunks(self.settings.big_page), stream)
            .await;
    }

    /// Streams everything between the caller's last known height and the chain tip.
    pub async fn get_latest(&self, request: &TaskRequest, stream: &StreamAccess) {
        let Ok(latest_request) = decode_payload::<LatestDataRequest>(request) else {
            send_error(stream, &request.id, "Cannot unmarshal payload");
            return;
        };

        let block = match self.rpc.get_block(HeightHash::default()).await {
            Ok(block) => block,
            Err(e) => {
                send_error(stream, &request.id, format!("Error getting block data {e}"));
                return;
            }
        };

        debug!(task_id = %request.id, latest = block.height, last = latest_request.last_height, "Got last block");
        let start = get_starting_height(
            latest_request.last_height,
            self.settings.maximum_heights_to_get,
            block.height,
        );

        let ranges = if start > block.height {
            Vec::new()
        } else {
            HeightRange::new(start, block.height).chunks(self.settings.big_page)
        };
        self.stream_ranges(&request.id, ranges, stream).await;
    }

    pub async fn get_latest_mark(&self, request: &TaskRequest, stream: &StreamAccess) {
        if decode_payload::<LatestDataRequest>(request).is_err() {
            send_error(stream, &request.id, "Cannot unmarshal payload");
            return;
        }

        let block = match self.rpc.get_block(HeightHash::default()).await {
            Ok(block) => block,
            Err(e) => {
                send_error(stream, &request.id, format!("Error getting block data {e}"));
                return;
            }
        };

        let mark = LatestDataResponse {
            last_hash: block.hash,
            last_height: block.height,
            last_time: block.time,
        };
        let payload = match serde_json::to_value(&mark) {
            Ok(payload) => Some(payload),
            Err(e) => {
                error!(task_id = %request.id, error = %e, "Error encoding payload data");
                None
            }
        };

        let response = TaskResponse {
            id: request.id.clone(),
            kind: "LatestMark".to_string(),
            order: 0,
            is_final: true,
            error: None,
            payload,
        };
        if let Err(e) = stream.send(response) {
            error!(task_id = %request.id, error = %e, "Error sending latest mark");
        }
    }

    pub async fn get_block(&self, request: &TaskRequest, stream: &StreamAccess) {
        let Ok(params) = decode_payload::<HeightHash>(request) else {
            send_error(stream, &request.id, "Cannot unmarshal payload");
            return;
        };

        match self.rpc.get_block(params).await {
            Ok(block) => self.send_single(&request.id, OutResp::Block(block), stream).await,
            Err(e) => {
                error!(task_id = %request.id, error = %e, "Error getting block");
                send_error(stream, &request.id, format!("Error getting block data {e}"));
            }
        }
    }

    pub async fn get_reward(&self, request: &TaskRequest, stream: &StreamAccess) {
        let Ok(params) = decode_payload::<HeightAccount>(request) else {
            send_error(stream, &request.id, "Cannot unmarshal payload");
            return;
        };

        match self.lcd.get_reward(params).await {
            Ok(reward) => self.send_single(&request.id, OutResp::Reward(reward), stream).await,
            Err(e) => {
                error!(task_id = %request.id, error = %e, "Error getting reward");
                send_error(stream, &request.id, format!("Error getting reward data {e}"));
            }
        }
    }

    ////////////////////////////////////////// Helpers //////////////////////////////////////////

    async fn send_single(&self, id: &str, item: OutResp, stream: &StreamAccess) {
        let (tx, rx) = mpsc::channel(1);
        let (_cancel, cancel_rx) = watch::channel(false);
        if tx.send(item).await.is_ok() {
            drop(tx);
            send_resp(id, rx, stream, cancel_rx, self.metrics.as_ref()).await;
        }
    }

    /// Fetches `ranges` in order while a sender drains results to the stream concurrently.
    async fn stream_ranges(&self, id: &str, ranges: Vec<HeightRange>, stream: &StreamAccess) {
        let (tx, rx) = mpsc::channel((PAGE * 2 + 1) as usize);
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let fetch = async move {
            for range in ranges {
                if let Err(e) = get_range(self.rpc.as_ref(), range, &tx).await {
                    error!(task_id = id, start = range.start_height, end = range.end_height, error = %e, "Error getting range");
                    cancel_tx.send_replace(true);
                    return Err(e);
                }
            }
            debug!(task_id = id, "Received all");
            Ok(())
        };

        let (fetched, completed) = tokio::join!(
            fetch,
            send_resp(id, rx, stream, cancel_rx, self.metrics.as_ref())
        );
        match fetched {
            Err(e) => send_error(stream, id, e.to_string()),
            Ok(()) if completed => info!(task_id = id, "Finished sending all"),
            Ok(()) => {}
        }
    }
}

fn decode_payload<T: DeserializeOwned>(request: &TaskRequest) -> Result<T, WorkerError> {
    Ok(serde_json::from_value(request.payload.clone())?)
}

fn send_error(stream: &StreamAccess, id: &str, msg: impl Into<String>) {
    if let Err(e) = stream.send(TaskResponse::error(id, msg)) {
        error!(task_id = id, error = %e, "Error sending error response");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tasks::TaskError;

    #[test]
    fn test_settings_from_config() {
        let config: Config = serde_json::from_value(serde_json::json!({
            "chain_name": "kava", "chain_id": "kava-4",
            "rpc_url": "http://localhost:26657", "lcd_url": "http://localhost:1317",
            "requests_per_second": 10, "request_timeout_secs": 5,
            "big_page": 0, "maximum_heights_to_get": 1000,
            "block_cache_capacity": 10, "workers_per_stream": 0, "task_timeout_secs": 300,
            "server": {"address": "0.0.0.0", "port": 8098},
            "metrics": {"enabled": false, "address": "0.0.0.0", "port": 8099}
        }))
        .unwrap();

        let settings = ClientSettings::from(&config);
        assert_eq!(settings.big_page, 1);
        assert_eq!(settings.workers_per_stream, 1);
        assert_eq!(settings.task_timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_error_response_is_final() {
        let (stream, mut handle) = StreamAccess::new("s", 1);
        send_error(&stream, "t", "There is no such handler Nope");
        let resp = handle.responses.try_recv().unwrap();
        assert!(resp.is_final);
        assert_eq!(
            resp.error,
            Some(TaskError {
                msg: "There is no such handler Nope".to_string()
            })
        );
    }
}

use anyhow::{Context, Result};
use axum::extract::{Json, State};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

use crate::indexer::rpc::{Lcd, Rpc};
use crate::models::tasks::{TaskRequest, TaskResponse};
use crate::worker::IndexerClient;
use crate::worker::stream::StreamAccess;

static NEXT_STREAM: AtomicU64 = AtomicU64::new(0);

pub fn router<R, L>(client: Arc<IndexerClient<R, L>>) -> Router
where
    R: Rpc + 'static,
    L: Lcd + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/tasks", post(run_task::<R, L>))
        .with_state(client)
}

async fn health() -> &'static str {
    "OK"
}

async fn run_task<R, L>(
    State(client): State<Arc<IndexerClient<R, L>>>,
    Json(request): Json<TaskRequest>,
) -> Json<Vec<TaskResponse>>
where
    R: Rpc + 'static,
    L: Lcd + 'static,
{
    Json(execute(&client, request).await)
}

/// Registers a stream for one request, collects its responses up to the final
/// one and closes the stream again.
pub async fn execute<R, L>(client: &Arc<IndexerClient<R, L>>, request: TaskRequest) -> Vec<TaskResponse>
where
    R: Rpc + 'static,
    L: Lcd + 'static,
{
    let stream_id = format!(
        "http-{}-{}",
        request.id,
        NEXT_STREAM.fetch_add(1, Ordering::Relaxed)
    );
    let (stream, mut handle) = StreamAccess::new(stream_id.as_str(), 1);
    client.register_stream(stream).await;

    let mut responses = Vec::new();
    if handle.requests.send(request).await.is_ok() {
        while let Some(response) = handle.responses.recv().await {
            let done = response.is_final;
            responses.push(response);
            if done {
                break;
            }
        }
    }

    client.close_stream(&stream_id).await;
    responses
}

pub async fn serve(router: Router, addr: &str, port: u16) -> Result<()> {
    let addr = format!("{addr}:{port}")
        .parse::<SocketAddr>()
        .context("invalid server address")?;

    info!("Starting task server - binding to {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind task listener")?;

    axum::serve(listener, router)
        .await
        .context("task server stopped")
}

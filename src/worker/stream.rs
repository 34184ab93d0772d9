use std::sync::Arc;
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{debug, error};

use crate::metrics::MetricsSink;
use crate::models::errors::WorkerError;
use crate::models::tasks::{OutResp, TaskRequest, TaskResponse};

/// One manager connection: an inbound task queue shared by a pool of workers
/// and an outbound response queue.
pub struct StreamAccess {
    pub stream_id: String,
    requests: Mutex<mpsc::Receiver<TaskRequest>>,
    responses: mpsc::UnboundedSender<TaskResponse>,
    finish: watch::Sender<bool>,
}

/// The manager's side of a stream.
pub struct StreamHandle {
    pub requests: mpsc::Sender<TaskRequest>,
    pub responses: mpsc::UnboundedReceiver<TaskResponse>,
}

impl StreamAccess {
    pub fn new(stream_id: impl Into<String>, queue: usize) -> (Arc<Self>, StreamHandle) {
        let (req_tx, req_rx) = mpsc::channel(queue.max(1));
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();
        let (finish, _) = watch::channel(false);

        let access = Arc::new(Self {
            stream_id: stream_id.into(),
            requests: Mutex::new(req_rx),
            responses: resp_tx,
            finish,
        });
        let handle = StreamHandle {
            requests: req_tx,
            responses: resp_rx,
        };
        (access, handle)
    }

    pub fn send(&self, response: TaskResponse) -> Result<(), WorkerError> {
        self.responses
            .send(response)
            .map_err(|_| WorkerError::StreamClosed(self.stream_id.clone()))
    }

    /// Next queued task, or `None` once the manager dropped its sender.
    pub async fn next_request(&self) -> Option<TaskRequest> {
        self.requests.lock().await.recv().await
    }

    pub fn finish(&self) {
        self.finish.send_replace(true);
    }

    pub fn finished(&self) -> watch::Receiver<bool> {
        self.finish.subscribe()
    }
}

/// Resolves once `cancel` flips to true. A dropped sender never cancels.
pub async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    let closed = cancel.wait_for(|c| *c).await.is_err();
    if closed {
        std::future::pending::<()>().await;
    }
}

/// Forwards handler output to the stream with increasing `order`, then a final `END`.
///
/// Returns false when `cancel` fired before `input` was drained. A cancelled
/// task gets no `END`; whoever cancelled it owns the terminal response.
pub async fn send_resp(
    id: &str,
    mut input: mpsc::Receiver<OutResp>,
    stream: &StreamAccess,
    mut cancel: watch::Receiver<bool>,
    metrics: &dyn MetricsSink,
) -> bool {
    let mut order = 0u64;
    let mut completed = true;

    loop {
        tokio::select! {
            biased;
            _ = cancelled(&mut cancel) => {
                completed = false;
                break;
            }
            item = input.recv() => {
                let Some(out) = item else { break };

                let payload = match out.to_payload() {
                    Ok(payload) => Some(payload),
                    Err(e) => {
                        error!(task_id = id, error = %e, "Error encoding payload data");
                        None
                    }
                };

                let response = TaskResponse {
                    id: id.to_string(),
                    kind: out.kind().to_string(),
                    order,
                    is_final: false,
                    error: None,
                    payload,
                };
                order += 1;

                if let Err(e) = stream.send(response) {
                    error!(task_id = id, error = %e, "Error sending data");
                }
                metrics.response_sent(out.kind());
            }
        }
    }

    if !completed {
        debug!(task_id = id, sent = order, "Cancelled before end");
        return false;
    }

    let end = TaskResponse {
        id: id.to_string(),
        kind: "END".to_string(),
        order,
        is_final: true,
        ..Default::default()
    };
    if let Err(e) = stream.send(end) {
        error!(task_id = id, error = %e, "Error sending end");
    }

    debug!(task_id = id, sent = order, "Finished sending");
    true
}

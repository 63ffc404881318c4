//! Async client for the launcher backend.
//!
//! Requests are correlated to responses by id, so responses may complete in
//! any order relative to when their requests were issued. The client half is
//! cheaply cloneable; push notifications arrive on a separate channel handed
//! out at connect time.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::UnixStream;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio_util::codec::Framed;

use crate::protocol::{Message, Notification, Request, RequestId, Response, RpcError, methods};
use crate::transport::{CodecError, WireCodec};
use crate::types::{ContextAction, ResponseTag, SearchResult};

/// How long to wait for any single backend response.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn runtime_dir() -> PathBuf {
    std::env::var("XDG_RUNTIME_DIR").map_or_else(|_| std::env::temp_dir(), PathBuf::from)
}

/// Default socket path for the launcher backend.
#[must_use]
pub fn socket_path() -> PathBuf {
    runtime_dir().join("beam.sock")
}

/// Errors that can occur with the backend client
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RPC error: {code} - {message}")]
    Rpc { code: i32, message: String },

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Request timeout")]
    Timeout,
}

impl From<RpcError> for ClientError {
    fn from(e: RpcError) -> Self {
        ClientError::Rpc {
            code: e.code,
            message: e.message,
        }
    }
}

type PendingRequest = oneshot::Sender<Result<Response, ClientError>>;
type Sink = futures_util::stream::SplitSink<Framed<UnixStream, WireCodec>, Message>;

/// Client for the launcher backend contract.
#[derive(Clone)]
pub struct LauncherClient {
    sender: Arc<Mutex<Sink>>,
    pending: Arc<Mutex<HashMap<RequestId, PendingRequest>>>,
    next_id: Arc<AtomicU64>,
}

impl LauncherClient {
    /// Connect at the default socket path.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Io` if the socket connection fails.
    pub async fn connect() -> Result<(Self, mpsc::Receiver<Notification>), ClientError> {
        Self::connect_to(socket_path()).await
    }

    /// Connect at a custom socket path.
    ///
    /// Returns the client plus the channel on which backend push
    /// notifications (e.g. `index_status`) are delivered.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Io` if the socket connection fails.
    pub async fn connect_to(
        path: PathBuf,
    ) -> Result<(Self, mpsc::Receiver<Notification>), ClientError> {
        let stream = UnixStream::connect(&path).await?;
        let framed = Framed::new(stream, WireCodec::new());
        let (sink, stream) = framed.split();

        let pending: Arc<Mutex<HashMap<RequestId, PendingRequest>>> =
            Arc::new(Mutex::new(HashMap::new()));
        let pending_reader = pending.clone();

        let (push_tx, push_rx) = mpsc::channel(64);

        tokio::spawn(async move {
            let mut stream = stream;
            while let Some(result) = stream.next().await {
                match result {
                    Ok(Message::Response(resp)) => {
                        let mut pending = pending_reader.lock().await;
                        if let Some(tx) = pending.remove(&resp.id) {
                            let _ = tx.send(Ok(resp));
                        }
                    }
                    Ok(Message::Notification(notif)) => {
                        if push_tx.send(notif).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Request(req)) => {
                        // A request without an id is wire-equivalent to a
                        // notification; anything else is not ours to answer.
                        if req.id.is_none()
                            && push_tx
                                .send(Notification::new(req.method, req.params))
                                .await
                                .is_err()
                        {
                            break;
                        }
                    }
                    Err(e) => {
                        let mut pending = pending_reader.lock().await;
                        for (_, tx) in pending.drain() {
                            let _ = tx.send(Err(ClientError::ConnectionClosed));
                        }
                        tracing::warn!("backend stream error: {e}");
                        break;
                    }
                }
            }
        });

        Ok((
            Self {
                sender: Arc::new(Mutex::new(sink)),
                pending,
                next_id: Arc::new(AtomicU64::new(1)),
            },
            push_rx,
        ))
    }

    /// Send an RPC request and wait for its response.
    ///
    /// # Errors
    ///
    /// Returns an error if sending fails, the connection closes, the backend
    /// reports an RPC error, or the result does not deserialize.
    pub async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> Result<T, ClientError> {
        let id = RequestId::Number(self.next_id.fetch_add(1, Ordering::SeqCst));
        let request = Request::new(method, params, id.clone());

        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().await;
            pending.insert(id.clone(), tx);
        }

        {
            let mut sender = self.sender.lock().await;
            sender.send(Message::Request(request)).await?;
        }

        let response = match tokio::time::timeout(REQUEST_TIMEOUT, rx).await {
            Ok(result) => result.map_err(|_| ClientError::ConnectionClosed)??,
            Err(_) => {
                // Reclaim the slot so a stalled backend cannot grow the map.
                let mut pending = self.pending.lock().await;
                pending.remove(&id);
                return Err(ClientError::Timeout);
            }
        };

        if let Some(error) = response.error {
            return Err(error.into());
        }

        // A void result is sent as `"result":null`, which round-trips into
        // `None`; both forms deserialize from null.
        let result = response.result.unwrap_or(serde_json::Value::Null);
        Ok(serde_json::from_value(result)?)
    }

    /// Whether this is the first launch since installation.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC request fails.
    pub async fn is_first_run(&self) -> Result<bool, ClientError> {
        self.request(methods::IS_FIRST_RUN, None).await
    }

    /// Persist the onboarding completion with the chosen shortcut binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC request fails.
    pub async fn complete_onboarding(&self, shortcut: &str) -> Result<(), ClientError> {
        self.request(
            methods::COMPLETE_ONBOARDING,
            Some(json!({ "shortcut": shortcut })),
        )
        .await
    }

    /// Run a search. An empty query returns the default result set.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC request fails.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ClientError> {
        self.request(methods::SEARCH, Some(json!({ "query": query })))
            .await
    }

    /// Execute a result by backend id.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC request fails.
    pub async fn execute(&self, result_id: &str) -> Result<ResponseTag, ClientError> {
        self.request(methods::EXECUTE, Some(json!({ "id": result_id })))
            .await
    }

    /// Ask the backend to hide the launcher window.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC request fails.
    pub async fn hide_window(&self) -> Result<(), ClientError> {
        self.request(methods::HIDE_WINDOW, None).await
    }

    /// Fetch the context actions available for a result.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC request fails.
    pub async fn context_actions(&self, result_id: &str) -> Result<Vec<ContextAction>, ClientError> {
        self.request(methods::CONTEXT_ACTIONS, Some(json!({ "id": result_id })))
            .await
    }

    /// Execute a context action against its target result.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC request fails.
    pub async fn execute_context_action(
        &self,
        result_id: &str,
        action_id: &str,
    ) -> Result<ResponseTag, ClientError> {
        self.request(
            methods::EXECUTE_CONTEXT_ACTION,
            Some(json!({ "id": result_id, "action": action_id })),
        )
        .await
    }
}

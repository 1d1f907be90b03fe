//! Request/response routing over one JSON-RPC byte stream.
//!
//! A reader task owns the server's output and hands each response to the
//! waiter registered under its id. A writer task owns the server's input.
//! Callers never touch either stream, so a request that times out or is
//! dropped leaves no half-read frame behind for the next one.

use lsp_types::notification::{Cancel, Notification};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncRead, AsyncWrite, BufReader};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace, warn};

use super::client::LspError;
use super::transport::{
    read_message, write_message, Incoming, JsonRpcNotification, JsonRpcRequest, ResponseError,
};

type Reply = (Value, Option<ResponseError>);

#[derive(Default)]
struct Pending {
    waiters: HashMap<u64, oneshot::Sender<Reply>>,
    closed: bool,
}

fn lock(pending: &Mutex<Pending>) -> MutexGuard<'_, Pending> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Removes a waiter when its call finishes, times out or is dropped.
struct Waiter<'a> {
    id: u64,
    pending: &'a Mutex<Pending>,
}

impl Drop for Waiter<'_> {
    fn drop(&mut self) {
        lock(self.pending).waiters.remove(&self.id);
    }
}

/// A live JSON-RPC connection with any number of requests in flight.
pub struct Connection {
    outgoing: mpsc::UnboundedSender<Value>,
    pending: Arc<Mutex<Pending>>,
    next_id: AtomicU64,
    request_timeout: Duration,
}

impl Connection {
    /// Start the reader and writer tasks. Must be called inside a tokio runtime.
    pub fn spawn<R, W>(reader: R, writer: W, request_timeout: Duration) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (outgoing, incoming) = mpsc::unbounded_channel();
        let pending = Arc::new(Mutex::new(Pending::default()));

        tokio::spawn(write_loop(writer, incoming));
        tokio::spawn(read_loop(
            BufReader::new(reader),
            outgoing.clone(),
            pending.clone(),
        ));

        Self {
            outgoing,
            pending,
            next_id: AtomicU64::new(1),
            request_timeout,
        }
    }

    /// Send a request and wait for its result, up to the request timeout.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, LspError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (reply_tx, reply_rx) = oneshot::channel();
        {
            let mut pending = lock(&self.pending);
            if pending.closed {
                return Err(LspError::Closed);
            }
            pending.waiters.insert(id, reply_tx);
        }
        let _waiter = Waiter {
            id,
            pending: &self.pending,
        };

        self.send(&JsonRpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        })?;

        let (result, error) = match tokio::time::timeout(self.request_timeout, reply_rx).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(_)) => return Err(LspError::Closed),
            Err(_) => {
                debug!("Request {} ({}) timed out, cancelling", id, method);
                if let Err(e) = self.notify(Cancel::METHOD, json!({ "id": id })) {
                    debug!("Could not cancel request {}: {}", id, e);
                }
                return Err(LspError::Timeout {
                    method: method.to_string(),
                    secs: self.request_timeout.as_secs(),
                });
            }
        };

        match error {
            Some(err) => Err(LspError::Server {
                method: method.to_string(),
                code: err.code,
                message: err.message,
            }),
            None => Ok(result),
        }
    }

    /// Queue a notification. Fails only once the connection is gone.
    pub fn notify(&self, method: &str, params: Value) -> Result<(), LspError> {
        self.send(&JsonRpcNotification {
            jsonrpc: "2.0",
            method,
            params,
        })
    }

    fn send<T: Serialize>(&self, message: &T) -> Result<(), LspError> {
        let value = serde_json::to_value(message)?;
        self.outgoing.send(value).map_err(|_| LspError::Closed)
    }
}

async fn write_loop<W>(mut writer: W, mut incoming: mpsc::UnboundedReceiver<Value>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = incoming.recv().await {
        if let Err(e) = write_message(&mut writer, &message).await {
            warn!("Error writing to language server: {}", e);
            break;
        }
    }
}

async fn read_loop<R>(
    mut reader: R,
    outgoing: mpsc::UnboundedSender<Value>,
    pending: Arc<Mutex<Pending>>,
) where
    R: AsyncBufRead + Unpin,
{
    loop {
        let message = match read_message(&mut reader).await.and_then(Incoming::from_value) {
            Ok(message) => message,
            Err(LspError::Closed) => {
                debug!("Language server closed its output");
                break;
            }
            Err(LspError::Io(e)) => {
                warn!("Error reading from language server: {}", e);
                break;
            }
            Err(e) => {
                warn!("Skipping unreadable message: {}", e);
                continue;
            }
        };

        match message {
            Incoming::Response { id, result, error } => {
                let waiter = id.as_u64().and_then(|id| lock(&pending).waiters.remove(&id));
                match waiter {
                    Some(waiter) => {
                        // The caller may have given up in the meantime.
                        let _ = waiter.send((result, error));
                    }
                    None => debug!("Discarding response for stale request {}", id),
                }
            }
            Incoming::Request { id, method, params } => {
                trace!("Answering server request {}", method);
                let reply = json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": server_request_result(&method, &params),
                });
                if outgoing.send(reply).is_err() {
                    break;
                }
            }
            Incoming::Notification { method, .. } => {
                trace!("Ignoring server notification {}", method);
            }
        }
    }

    let mut pending = lock(&pending);
    pending.closed = true;
    pending.waiters.clear();
}

/// Result sent back for requests the server makes to us.
pub(crate) fn server_request_result(method: &str, params: &Value) -> Value {
    match method {
        "workspace/configuration" => {
            let items = params["items"].as_array().map_or(0, Vec::len);
            Value::Array(vec![Value::Null; items])
        }
        _ => Value::Null,
    }
}

//! JSON-RPC framing over a byte stream.
//!
//! Every message is a `Content-Length: N\r\n\r\n` header block followed by
//! exactly N bytes of JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::client::LspError;

/// Outgoing request.
#[derive(Serialize, Debug)]
pub struct JsonRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

/// Outgoing notification (no id, no response).
#[derive(Serialize, Debug)]
pub struct JsonRpcNotification<'a> {
    pub jsonrpc: &'static str,
    pub method: &'a str,
    pub params: Value,
}

/// Error object carried by a failed response.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ResponseError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// A message read from the server, sorted by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    Response {
        id: Value,
        result: Value,
        error: Option<ResponseError>,
    },
    Request {
        id: Value,
        method: String,
        params: Value,
    },
    Notification {
        method: String,
        params: Value,
    },
}

#[derive(Deserialize)]
struct RawMessage {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    params: Value,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<ResponseError>,
}

impl Incoming {
    pub fn from_value(value: Value) -> Result<Self, LspError> {
        let raw: RawMessage = serde_json::from_value(value)?;
        let message = match (raw.id, raw.method) {
            (Some(id), Some(method)) => Self::Request {
                id,
                method,
                params: raw.params,
            },
            (None, Some(method)) => Self::Notification {
                method,
                params: raw.params,
            },
            (Some(id), None) => Self::Response {
                id,
                result: raw.result.unwrap_or(Value::Null),
                error: raw.error,
            },
            (None, None) => {
                return Err(LspError::Framing(
                    "message has neither id nor method".to_string(),
                ))
            }
        };
        Ok(message)
    }
}

/// Write one framed message.
pub async fn write_message<W, T>(writer: &mut W, message: &T) -> Result<(), LspError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let body = serde_json::to_vec(message)?;
    let header = format!("Content-Length: {}\r\n\r\n", body.len());
    writer.write_all(header.as_bytes()).await?;
    writer.write_all(&body).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one framed message. Returns [`LspError::Closed`] at end of stream.
pub async fn read_message<R>(reader: &mut R) -> Result<Value, LspError>
where
    R: AsyncBufRead + Unpin,
{
    let mut content_length: Option<usize> = None;
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Err(LspError::Closed);
        }

        let header = line.trim();
        if header.is_empty() {
            break;
        }

        if let Some((name, value)) = header.split_once(':') {
            if name.trim().eq_ignore_ascii_case("Content-Length") {
                let len = value.trim().parse().map_err(|_| {
                    LspError::Framing(format!("invalid Content-Length: {}", value.trim()))
                })?;
                content_length = Some(len);
            }
        }
    }

    let content_length = content_length
        .ok_or_else(|| LspError::Framing("missing Content-Length header".to_string()))?;

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).await?;

    Ok(serde_json::from_slice(&body)?)
}

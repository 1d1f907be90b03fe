//! The capability set the navigator needs from a language server.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use super::types::{DefinitionResponse, FullDefinition, Position, SourceLocation, SymbolCandidate};

/// Errors raised while talking to a language server.
#[derive(Error, Debug)]
pub enum LspError {
    /// The server process could not be started.
    #[error("Failed to spawn language server '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading from or writing to the server failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A message could not be encoded or decoded.
    #[error("Invalid JSON-RPC payload: {0}")]
    Json(#[from] serde_json::Error),

    /// A frame arrived without a usable `Content-Length` header.
    #[error("Malformed message frame: {0}")]
    Framing(String),

    /// The server answered with an error object.
    #[error("{method} failed with code {code}: {message}")]
    Server {
        method: String,
        code: i64,
        message: String,
    },

    /// No answer arrived in time.
    #[error("{method} timed out after {secs}s")]
    Timeout { method: String, secs: u64 },

    /// The server closed its output stream.
    #[error("Language server connection closed")]
    Closed,

    /// A range returned by the server does not fit the file it names.
    #[error("Range outside of file {path}: line {line} of {line_count}")]
    RangeOutOfBounds {
        path: String,
        line: u32,
        line_count: usize,
    },

    /// A path could not be expressed as a `file://` URI.
    #[error("Invalid file path: {}", .0.display())]
    InvalidPath(PathBuf),
}

/// A position inside a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionRequest {
    pub path: PathBuf,
    pub position: Position,
}

/// A references query at a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRequest {
    pub path: PathBuf,
    pub position: Position,
    pub include_declaration: bool,
}

/// Requests a language server must answer for reference and definition lookups.
///
/// Implementations own session concerns such as file-open tracking and request
/// serialization; callers treat every method as one blocking round trip.
#[async_trait]
pub trait LanguageClient: Send + Sync {
    /// Make the file known to the server. Calling it twice is a no-op.
    async fn open_file(&self, path: &std::path::Path) -> Result<(), LspError>;

    /// All locations referring to the symbol at a position.
    async fn references(&self, request: &ReferenceRequest) -> Result<Vec<SourceLocation>, LspError>;

    /// Where the symbol at a position is defined.
    async fn definition(&self, request: &PositionRequest) -> Result<DefinitionResponse, LspError>;

    /// Fuzzy name lookup over the whole workspace.
    async fn workspace_symbols(&self, query: &str) -> Result<Vec<SymbolCandidate>, LspError>;

    /// Expand a location to the definition enclosing it.
    async fn full_definition(&self, location: &SourceLocation) -> Result<FullDefinition, LspError>;
}

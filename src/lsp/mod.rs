//! Language server access.
//!
//! The navigator only sees the [`LanguageClient`] trait. [`StdioClient`] is the
//! production implementation: it spawns a server process and speaks JSON-RPC
//! over its stdio. Tests substitute scripted clients.

mod client;
mod connection;
pub mod expand;
mod stdio;
pub mod transport;
mod types;

pub use client::{LanguageClient, LspError, PositionRequest, ReferenceRequest};
pub use expand::read_source;
pub use stdio::{language_id, StdioClient};
pub use types::{
    DefinitionLink, DefinitionResponse, FullDefinition, Position, Range, SourceLocation,
    SymbolCandidate, SymbolKind,
};

//! MCP (Model Context Protocol) server for code navigation.
//!
//! ## Usage
//!
//! ```ignore
//! use codenav::mcp::NavigatorServer;
//!
//! let server = NavigatorServer::new(navigator, root_path);
//! server.run().await?;
//! ```

mod server;

pub use server::{
    FindReferencesRequest, GoToDefinitionRequest, NavigatorServer, ReadDefinitionRequest,
    ReferencesAtPositionRequest,
};

//! MCP server exposing reference and definition navigation.

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router,
    transport::stdio,
    ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::lsp::LanguageClient;
use crate::navigation::{NavigationError, Navigator};

/// Request parameters for name-based reference search
#[derive(Debug, Deserialize, JsonSchema)]
pub struct FindReferencesRequest {
    #[schemars(
        description = "Name of the symbol, e.g. 'Start' or a method qualified by its type such as 'Server.Start'"
    )]
    symbol_name: String,
}

/// Request parameters for position-based reference search
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReferencesAtPositionRequest {
    #[schemars(description = "Path to the file, absolute or relative to the workspace root")]
    file_path: String,

    #[schemars(description = "Line number, starting at 1")]
    line: u32,

    #[schemars(description = "Column number, starting at 1")]
    column: u32,

    #[schemars(description = "Also list the declaration itself (default: false)")]
    #[serde(default)]
    include_declaration: bool,
}

/// Request parameters for position-based definition lookup
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GoToDefinitionRequest {
    #[schemars(description = "Path to the file, absolute or relative to the workspace root")]
    file_path: String,

    #[schemars(description = "Line number, starting at 1")]
    line: u32,

    #[schemars(description = "Column number, starting at 1")]
    column: u32,
}

/// Request parameters for name-based definition lookup
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReadDefinitionRequest {
    #[schemars(
        description = "Name of the symbol, e.g. 'Config' or a method qualified by its type such as 'Server.Start'"
    )]
    symbol_name: String,
}

/// MCP server over a [`Navigator`] backed by any language client.
#[derive(Clone)]
pub struct NavigatorServer {
    navigator: Arc<Navigator<dyn LanguageClient>>,
    root_path: PathBuf,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl NavigatorServer {
    pub fn new(navigator: Arc<Navigator<dyn LanguageClient>>, root_path: PathBuf) -> Self {
        Self {
            navigator,
            root_path,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        name = "find_references",
        description = "Find all references to a symbol by name across the workspace. Results are grouped by file and shown with surrounding context lines."
    )]
    async fn find_references(
        &self,
        Parameters(req): Parameters<FindReferencesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let report = self.navigator.find_references(&req.symbol_name).await;
        respond(report)
    }

    #[tool(
        name = "find_references_at_position",
        description = "Find all references to the symbol at a file position (1-based line and column). Results are grouped by file and shown with surrounding context lines."
    )]
    async fn find_references_at_position(
        &self,
        Parameters(req): Parameters<ReferencesAtPositionRequest>,
    ) -> Result<CallToolResult, McpError> {
        let path = resolve_path(&self.root_path, &req.file_path);
        let report = self
            .navigator
            .find_references_at_position(&path, req.line, req.column, req.include_declaration)
            .await;
        respond(report)
    }

    #[tool(
        name = "go_to_definition",
        description = "Show where the symbol at a file position (1-based line and column) is defined, with the complete definition and surrounding lines."
    )]
    async fn go_to_definition(
        &self,
        Parameters(req): Parameters<GoToDefinitionRequest>,
    ) -> Result<CallToolResult, McpError> {
        let path = resolve_path(&self.root_path, &req.file_path);
        let report = self
            .navigator
            .go_to_definition(&path, req.line, req.column)
            .await;
        respond(report)
    }

    #[tool(
        name = "read_definition",
        description = "Read the complete source of a symbol's definition by name, e.g. a function, type, constant, or a method given as 'Type.method'."
    )]
    async fn read_definition(
        &self,
        Parameters(req): Parameters<ReadDefinitionRequest>,
    ) -> Result<CallToolResult, McpError> {
        let report = self.navigator.read_definition(&req.symbol_name).await;
        respond(report)
    }

    /// Run the MCP server using stdio transport
    pub async fn run(self) -> anyhow::Result<()> {
        let service = self.serve(stdio()).await?;
        service.waiting().await?;
        Ok(())
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

#[tool_handler]
impl ServerHandler for NavigatorServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "codenav".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: Some("Code Navigation".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Language-server backed code navigation.\n\n\
                 Available tools:\n\
                 - find_references: all usages of a symbol given by name\n\
                 - find_references_at_position: all usages of the symbol at a file position\n\
                 - go_to_definition: the definition of the symbol at a file position\n\
                 - read_definition: the full source of a symbol given by name\n\n\
                 Lines and columns are 1-based."
                    .into(),
            ),
        }
    }
}

fn respond(report: Result<String, NavigationError>) -> Result<CallToolResult, McpError> {
    report
        .map(|text| CallToolResult::success(vec![Content::text(text)]))
        .map_err(to_mcp_error)
}

fn to_mcp_error(err: NavigationError) -> McpError {
    if err.is_invalid_argument() {
        McpError::invalid_params(err.to_string(), None)
    } else {
        McpError::internal_error(err.to_string(), None)
    }
}

fn resolve_path(root: &Path, file_path: &str) -> PathBuf {
    let path = Path::new(file_path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

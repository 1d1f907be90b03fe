//! Language server client over a child process's stdin/stdout.
//!
//! The server is spawned once per client and initialized eagerly. Framing and
//! response routing live in `connection`; this module adds the process and
//! the LSP methods on top.

use async_trait::async_trait;
use lsp_types::notification::{DidOpenTextDocument, Exit, Initialized, Notification};
use lsp_types::request::{
    DocumentSymbolRequest, GotoDefinition, Initialize, References, Request, Shutdown,
    WorkspaceSymbolRequest,
};
use lsp_types::{
    DidOpenTextDocumentParams, DocumentSymbolParams, GotoDefinitionParams, OneOf,
    ReferenceContext, ReferenceParams, TextDocumentIdentifier, TextDocumentItem,
    TextDocumentPositionParams, Url, WorkspaceSymbolParams, WorkspaceSymbolResponse,
};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::client::{LanguageClient, LspError, PositionRequest, ReferenceRequest};
use super::connection::Connection;
use super::expand::{enclosing_range, expand_to_lines, read_source};
use super::types::{
    DefinitionResponse, FullDefinition, Position, Range, SourceLocation, SymbolCandidate,
    SymbolKind,
};
use crate::config::LspConfig;

/// Language id sent with `textDocument/didOpen`.
pub fn language_id(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()).unwrap_or("") {
        "rs" => "rust",
        "py" | "pyi" => "python",
        "js" | "mjs" | "cjs" => "javascript",
        "jsx" => "javascriptreact",
        "ts" | "mts" | "cts" => "typescript",
        "tsx" => "typescriptreact",
        "go" => "go",
        "java" => "java",
        "c" | "h" => "c",
        "cpp" | "cc" | "cxx" | "hpp" | "hxx" => "cpp",
        "rb" => "ruby",
        "php" => "php",
        "swift" => "swift",
        "kt" | "kts" => "kotlin",
        "scala" => "scala",
        "cs" => "csharp",
        "ml" | "mli" => "ocaml",
        "hs" => "haskell",
        "lua" => "lua",
        "zig" => "zig",
        _ => "plaintext",
    }
}

fn file_url(path: &Path) -> Result<Url, LspError> {
    Url::from_file_path(path).map_err(|_| LspError::InvalidPath(path.to_path_buf()))
}

/// Log each line the server writes to stderr until the stream ends.
///
/// Returns the number of lines seen. Bytes that are not UTF-8 are replaced.
async fn drain_lines<R: AsyncRead + Unpin>(reader: R) -> usize {
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    let mut count = 0;

    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {
                count += 1;
                debug!(
                    target: "codenav::lsp::server",
                    "{}",
                    String::from_utf8_lossy(&line).trim_end()
                );
            }
            Err(e) => {
                debug!("Stopped reading language server stderr: {}", e);
                break;
            }
        }
    }
    count
}

/// A language server spawned as a child process.
pub struct StdioClient {
    connection: Connection,
    child: Mutex<Child>,
    opened: Mutex<HashSet<PathBuf>>,
    root: PathBuf,
}

impl StdioClient {
    /// Spawn the configured server in `root` and run the initialize handshake.
    pub async fn start(config: &LspConfig, root: &Path) -> Result<Self, LspError> {
        info!("Starting language server: {} {}", config.command, config.args.join(" "));

        let mut child = Command::new(&config.command)
            .args(&config.args)
            .current_dir(root)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| LspError::Spawn {
                command: config.command.clone(),
                source,
            })?;

        let stdin = child.stdin.take().ok_or(LspError::Closed)?;
        let stdout = child.stdout.take().ok_or(LspError::Closed)?;

        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(drain_lines(stderr));
        }

        let client = Self {
            connection: Connection::spawn(
                stdout,
                stdin,
                Duration::from_secs(config.request_timeout_secs),
            ),
            child: Mutex::new(child),
            opened: Mutex::new(HashSet::new()),
            root: root.to_path_buf(),
        };

        client.initialize(config.initialization_options.clone()).await?;
        Ok(client)
    }

    async fn initialize(&self, options: Option<Value>) -> Result<(), LspError> {
        let root_uri = Url::from_directory_path(&self.root)
            .map_err(|_| LspError::InvalidPath(self.root.clone()))?;
        let name = self
            .root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "workspace".to_string());

        let params = json!({
            "processId": std::process::id(),
            "rootUri": root_uri,
            "rootPath": self.root,
            "workspaceFolders": [{"uri": root_uri, "name": name}],
            "initializationOptions": options,
            "capabilities": {
                "workspace": {
                    "configuration": true,
                    "workspaceFolders": true,
                    "symbol": {"dynamicRegistration": false}
                },
                "textDocument": {
                    "synchronization": {"dynamicRegistration": false, "didSave": false},
                    "references": {"dynamicRegistration": false},
                    "definition": {"dynamicRegistration": false, "linkSupport": true},
                    "documentSymbol": {
                        "dynamicRegistration": false,
                        "hierarchicalDocumentSymbolSupport": true
                    }
                }
            }
        });

        self.connection.call(Initialize::METHOD, params).await?;
        self.connection.notify(Initialized::METHOD, json!({}))?;
        debug!("Language server initialized for {}", self.root.display());
        Ok(())
    }

    async fn request<R: Request>(&self, params: R::Params) -> Result<R::Result, LspError> {
        let result = self.connection.call(R::METHOD, serde_json::to_value(params)?).await?;
        Ok(serde_json::from_value(result)?)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn position_params(
        &self,
        path: &Path,
        position: Position,
    ) -> Result<TextDocumentPositionParams, LspError> {
        let uri = file_url(&self.resolve(path))?;
        Ok(TextDocumentPositionParams::new(
            TextDocumentIdentifier::new(uri),
            position.into(),
        ))
    }

    /// Politely stop the server. The process is killed on drop regardless.
    pub async fn shutdown(&self) -> Result<(), LspError> {
        self.request::<Shutdown>(()).await?;
        self.connection.notify(Exit::METHOD, Value::Null)?;

        let mut child = self.child.lock().await;
        if tokio::time::timeout(Duration::from_secs(2), child.wait())
            .await
            .is_err()
        {
            debug!("Language server did not exit in time, killing it");
            child.kill().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl LanguageClient for StdioClient {
    async fn open_file(&self, path: &Path) -> Result<(), LspError> {
        let path = self.resolve(path);
        let mut opened = self.opened.lock().await;
        if opened.contains(&path) {
            return Ok(());
        }

        let text = read_source(&path).await?;
        let params = DidOpenTextDocumentParams {
            text_document: TextDocumentItem::new(
                file_url(&path)?,
                language_id(&path).to_string(),
                1,
                text,
            ),
        };
        self.connection
            .notify(DidOpenTextDocument::METHOD, serde_json::to_value(params)?)?;

        debug!("Opened {}", path.display());
        opened.insert(path);
        Ok(())
    }

    async fn references(&self, request: &ReferenceRequest) -> Result<Vec<SourceLocation>, LspError> {
        let params = ReferenceParams {
            text_document_position: self.position_params(&request.path, request.position)?,
            work_done_progress_params: Default::default(),
            partial_result_params: Default::default(),
            context: ReferenceContext {
                include_declaration: request.include_declaration,
            },
        };

        let locations = self.request::<References>(params).await?.unwrap_or_default();
        Ok(locations.into_iter().map(SourceLocation::from).collect())
    }

    async fn definition(&self, request: &PositionRequest) -> Result<DefinitionResponse, LspError> {
        let params = GotoDefinitionParams {
            text_document_position_params: self.position_params(&request.path, request.position)?,
            work_done_progress_params: Default::default(),
            partial_result_params: Default::default(),
        };

        Ok(self.request::<GotoDefinition>(params).await?.into())
    }

    async fn workspace_symbols(&self, query: &str) -> Result<Vec<SymbolCandidate>, LspError> {
        let params = WorkspaceSymbolParams {
            partial_result_params: Default::default(),
            work_done_progress_params: Default::default(),
            query: query.to_string(),
        };

        let candidates = match self.request::<WorkspaceSymbolRequest>(params).await? {
            None => Vec::new(),
            Some(WorkspaceSymbolResponse::Flat(infos)) => infos
                .into_iter()
                .map(|info| SymbolCandidate {
                    name: info.name,
                    kind: SymbolKind::from(info.kind),
                    container: info.container_name,
                    location: info.location.into(),
                })
                .collect(),
            Some(WorkspaceSymbolResponse::Nested(symbols)) => symbols
                .into_iter()
                .map(|symbol| {
                    let location = match symbol.location {
                        OneOf::Left(location) => location.into(),
                        OneOf::Right(workspace) => {
                            SourceLocation::new(workspace.uri.to_string(), Range::default())
                        }
                    };
                    SymbolCandidate {
                        name: symbol.name,
                        kind: SymbolKind::from(symbol.kind),
                        container: symbol.container_name,
                        location,
                    }
                })
                .collect(),
        };

        Ok(candidates)
    }

    async fn full_definition(&self, location: &SourceLocation) -> Result<FullDefinition, LspError> {
        let path = PathBuf::from(location.file_id());
        self.open_file(&path).await?;

        let params = DocumentSymbolParams {
            text_document: TextDocumentIdentifier::new(file_url(&path)?),
            work_done_progress_params: Default::default(),
            partial_result_params: Default::default(),
        };
        let symbols = self.request::<DocumentSymbolRequest>(params).await?;

        let range = symbols
            .as_ref()
            .and_then(|symbols| enclosing_range(symbols, location.range.start))
            .unwrap_or(location.range);

        let content = read_source(&path).await?;
        expand_to_lines(&content, location, range)
    }
}

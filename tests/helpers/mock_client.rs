use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use codenav::lsp::expand::expand_to_lines;
use codenav::lsp::{
    read_source, DefinitionResponse, FullDefinition, LanguageClient, LspError, Position, PositionRequest,
    Range, ReferenceRequest, SourceLocation, SymbolCandidate,
};

/// Scripted language client.
///
/// Answers come from tables filled in by the test; every request is recorded.
/// `full_definition` reads the real file and spans from the location's line to
/// the end line registered with [`with_definition_end`](Self::with_definition_end).
#[derive(Default)]
pub struct MockLanguageClient {
    references: HashMap<(PathBuf, Position), Vec<SourceLocation>>,
    definitions: HashMap<(PathBuf, Position), DefinitionResponse>,
    symbols: Vec<SymbolCandidate>,
    definition_ends: HashMap<(String, u32), u32>,
    unopenable: HashSet<PathBuf>,
    failing_references: bool,
    failing_references_from: HashSet<PathBuf>,
    failing_definition: bool,
    failing_symbols: bool,

    opened: Mutex<Vec<PathBuf>>,
    reference_requests: Mutex<Vec<ReferenceRequest>>,
    symbol_queries: Mutex<Vec<String>>,
}

impl MockLanguageClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_references(mut self, path: &Path, position: Position, hits: Vec<SourceLocation>) -> Self {
        self.references.insert((path.to_path_buf(), position), hits);
        self
    }

    pub fn with_definition(mut self, path: &Path, position: Position, response: DefinitionResponse) -> Self {
        self.definitions.insert((path.to_path_buf(), position), response);
        self
    }

    pub fn with_symbol(mut self, candidate: SymbolCandidate) -> Self {
        self.symbols.push(candidate);
        self
    }

    /// Definitions starting at `location` extend to `end_line` (0-based).
    pub fn with_definition_end(mut self, location: &SourceLocation, end_line: u32) -> Self {
        self.definition_ends
            .insert((location.uri.clone(), location.range.start.line), end_line);
        self
    }

    pub fn unopenable(mut self, path: &Path) -> Self {
        self.unopenable.insert(path.to_path_buf());
        self
    }

    pub fn failing_references(mut self) -> Self {
        self.failing_references = true;
        self
    }

    /// Fail only references requests made from `path`.
    pub fn failing_references_from(mut self, path: &Path) -> Self {
        self.failing_references_from.insert(path.to_path_buf());
        self
    }

    pub fn failing_definition(mut self) -> Self {
        self.failing_definition = true;
        self
    }

    pub fn failing_symbols(mut self) -> Self {
        self.failing_symbols = true;
        self
    }

    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened.lock().unwrap().clone()
    }

    pub fn reference_requests(&self) -> Vec<ReferenceRequest> {
        self.reference_requests.lock().unwrap().clone()
    }

    pub fn symbol_queries(&self) -> Vec<String> {
        self.symbol_queries.lock().unwrap().clone()
    }
}

fn server_error(method: &str) -> LspError {
    LspError::Server {
        method: method.to_string(),
        code: -32603,
        message: "scripted failure".to_string(),
    }
}

#[async_trait]
impl LanguageClient for MockLanguageClient {
    async fn open_file(&self, path: &Path) -> Result<(), LspError> {
        if self.unopenable.contains(path) {
            return Err(LspError::InvalidPath(path.to_path_buf()));
        }
        self.opened.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    async fn references(&self, request: &ReferenceRequest) -> Result<Vec<SourceLocation>, LspError> {
        self.reference_requests.lock().unwrap().push(request.clone());
        if self.failing_references || self.failing_references_from.contains(&request.path) {
            return Err(server_error("textDocument/references"));
        }
        Ok(self
            .references
            .get(&(request.path.clone(), request.position))
            .cloned()
            .unwrap_or_default())
    }

    async fn definition(&self, request: &PositionRequest) -> Result<DefinitionResponse, LspError> {
        if self.failing_definition {
            return Err(server_error("textDocument/definition"));
        }
        Ok(self
            .definitions
            .get(&(request.path.clone(), request.position))
            .cloned()
            .unwrap_or_default())
    }

    async fn workspace_symbols(&self, query: &str) -> Result<Vec<SymbolCandidate>, LspError> {
        self.symbol_queries.lock().unwrap().push(query.to_string());
        if self.failing_symbols {
            return Err(server_error("workspace/symbol"));
        }

        // Fuzzy like a real index: anything containing the last name segment.
        let needle = query.rsplit('.').next().unwrap_or(query);
        Ok(self
            .symbols
            .iter()
            .filter(|candidate| candidate.name.contains(needle))
            .cloned()
            .collect())
    }

    async fn full_definition(&self, location: &SourceLocation) -> Result<FullDefinition, LspError> {
        let content = read_source(Path::new(&location.file_id())).await?;
        let start = location.range.start;
        let end_line = self
            .definition_ends
            .get(&(location.uri.clone(), start.line))
            .copied()
            .unwrap_or(start.line);

        expand_to_lines(&content, location, Range::new(start, Position::new(end_line, 0)))
    }
}

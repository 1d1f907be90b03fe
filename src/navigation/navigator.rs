//! The four query entry points.
//!
//! Position-based and name-based queries differ only in how they find their
//! starting locations. Everything after that goes through the same
//! group -> window -> render pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::error::NavigationError;
use super::grouper::HitSet;
use super::matcher::SymbolMatcher;
use super::render::{render_definition, render_references, render_symbol_definition, render_unreadable};
use super::windows::{merge_windows, span_window};
use crate::config::NavigationConfig;
use crate::lsp::{
    read_source, LanguageClient, Position, PositionRequest, ReferenceRequest, SourceLocation,
};

/// Settings resolved once and fixed for the navigator's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationOptions {
    /// Lines of context shown around each hit.
    pub context_lines: usize,
    pub matcher: SymbolMatcher,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            context_lines: crate::config::DEFAULT_CONTEXT_LINES,
            matcher: SymbolMatcher::default(),
        }
    }
}

impl From<&NavigationConfig> for NavigationOptions {
    fn from(config: &NavigationConfig) -> Self {
        Self {
            context_lines: config.context_lines,
            matcher: SymbolMatcher::new(config.method_separators.clone()),
        }
    }
}

/// Reference and definition lookups against a language server.
pub struct Navigator<C: ?Sized> {
    client: Arc<C>,
    options: NavigationOptions,
}

impl<C: LanguageClient + ?Sized> Navigator<C> {
    pub fn new(client: Arc<C>, options: NavigationOptions) -> Self {
        Self { client, options }
    }

    pub fn options(&self) -> &NavigationOptions {
        &self.options
    }

    /// References to the symbol at a 1-indexed position.
    pub async fn find_references_at_position(
        &self,
        path: &Path,
        line: u32,
        column: u32,
        include_declaration: bool,
    ) -> Result<String, NavigationError> {
        let position = checked_position(line, column)?;
        self.open_query_file(path).await?;

        let request = ReferenceRequest {
            path: path.to_path_buf(),
            position,
            include_declaration,
        };
        let references = self
            .client
            .references(&request)
            .await
            .map_err(NavigationError::References)?;

        if references.is_empty() {
            return Ok(format!(
                "No references found at {}:{}:{}",
                path.display(),
                line,
                column
            ));
        }

        let hits = HitSet::group(references);
        info!(
            "Found {} references in {} files at {}:{}:{}",
            hits.hit_count(),
            hits.file_count(),
            path.display(),
            line,
            column
        );
        Ok(self.render_hits(&hits).await)
    }

    /// References to every workspace symbol matching `symbol_name`, in one report.
    pub async fn find_references(&self, symbol_name: &str) -> Result<String, NavigationError> {
        let candidates = self
            .client
            .workspace_symbols(symbol_name)
            .await
            .map_err(NavigationError::Symbol)?;
        let total = candidates.len();
        let matched = self.options.matcher.matches(symbol_name, candidates);
        debug!(
            "Symbol '{}' matched {} of {} candidates",
            symbol_name,
            matched.len(),
            total
        );

        let mut hits = HitSet::new();
        for candidate in &matched {
            let path = PathBuf::from(candidate.location.file_id());
            if let Err(e) = self.client.open_file(&path).await {
                warn!("Error opening file {}: {}", path.display(), e);
                continue;
            }

            let request = ReferenceRequest {
                path,
                position: candidate.location.range.start,
                include_declaration: false,
            };
            let references = self
                .client
                .references(&request)
                .await
                .map_err(NavigationError::References)?;
            hits.extend(references);
        }

        if hits.is_empty() {
            return Ok(format!("No references found for symbol: {}", symbol_name));
        }

        info!(
            "Found {} references to '{}' in {} files",
            hits.hit_count(),
            symbol_name,
            hits.file_count()
        );
        Ok(self.render_hits(&hits).await)
    }

    /// Definitions of the symbol at a 1-indexed position, each with surrounding context.
    pub async fn go_to_definition(
        &self,
        path: &Path,
        line: u32,
        column: u32,
    ) -> Result<String, NavigationError> {
        let position = checked_position(line, column)?;
        self.open_query_file(path).await?;

        let request = PositionRequest {
            path: path.to_path_buf(),
            position,
        };
        let targets = self
            .client
            .definition(&request)
            .await
            .map_err(NavigationError::Definition)?
            .into_locations();

        if targets.is_empty() {
            return Ok(format!(
                "No definition found at {}:{}:{}",
                path.display(),
                line,
                column
            ));
        }

        let targets = HitSet::group(targets);
        let mut blocks = Vec::new();
        for (file, locations) in targets.iter() {
            for target in locations {
                if let Some(block) = self.render_definition_target(file, target).await {
                    blocks.push(block);
                }
            }
        }

        if blocks.is_empty() {
            return Ok(format!(
                "Could not read definition at {}:{}:{}",
                path.display(),
                line,
                column
            ));
        }
        Ok(blocks.join("\n"))
    }

    /// Full definitions of every workspace symbol matching `symbol_name`.
    pub async fn read_definition(&self, symbol_name: &str) -> Result<String, NavigationError> {
        let candidates = self
            .client
            .workspace_symbols(symbol_name)
            .await
            .map_err(NavigationError::Symbol)?;
        let matched = self.options.matcher.matches_definition(symbol_name, candidates);

        let mut blocks = Vec::new();
        for candidate in &matched {
            debug!("Found symbol: {}", candidate.name);
            let path = PathBuf::from(candidate.location.file_id());
            if let Err(e) = self.client.open_file(&path).await {
                warn!("Error opening file {}: {}", path.display(), e);
                continue;
            }

            match self.client.full_definition(&candidate.location).await {
                Ok(definition) => blocks.push(render_symbol_definition(candidate, &definition)),
                Err(e) => warn!("Error getting definition of {}: {}", candidate.name, e),
            }
        }

        if blocks.is_empty() {
            return Ok(format!("{} not found", symbol_name));
        }
        Ok(blocks.join("\n"))
    }

    async fn open_query_file(&self, path: &Path) -> Result<(), NavigationError> {
        self.client
            .open_file(path)
            .await
            .map_err(|source| NavigationError::OpenFile {
                path: path.to_path_buf(),
                source,
            })
    }

    /// One block per file, in file order. Unreadable files keep their header.
    async fn render_hits(&self, hits: &HitSet) -> String {
        let mut blocks = Vec::with_capacity(hits.file_count());

        for (file, locations) in hits.iter() {
            let content = match read_source(Path::new(file)).await {
                Ok(content) => content,
                Err(e) => {
                    warn!("Error reading file {}: {}", file, e);
                    blocks.push(render_unreadable(file, locations, &e));
                    continue;
                }
            };

            let lines: Vec<&str> = content.split('\n').collect();
            let hit_lines: Vec<usize> = locations
                .iter()
                .map(|loc| loc.range.start.line as usize)
                .collect();
            let windows = merge_windows(&hit_lines, lines.len(), self.options.context_lines);
            blocks.push(render_references(file, &lines, locations, &windows));
        }

        blocks.join("\n")
    }

    async fn render_definition_target(&self, file: &str, target: &SourceLocation) -> Option<String> {
        let path = Path::new(file);
        if let Err(e) = self.client.open_file(path).await {
            warn!("Error opening file {}: {}", file, e);
            return None;
        }

        let definition = match self.client.full_definition(target).await {
            Ok(definition) => definition,
            Err(e) => {
                warn!("Error getting full definition in {}: {}", file, e);
                return None;
            }
        };

        let content = match read_source(path).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Error reading file {}: {}", file, e);
                return None;
            }
        };

        let lines: Vec<&str> = content.split('\n').collect();
        let range = definition.location.range;
        let window = span_window(
            range.start.line as usize,
            range.end.line as usize,
            lines.len(),
            self.options.context_lines,
        )?;

        Some(render_definition(file, range, &lines, window))
    }
}

fn checked_position(line: u32, column: u32) -> Result<Position, NavigationError> {
    Position::from_one_based(line, column).ok_or(NavigationError::InvalidPosition { line, column })
}

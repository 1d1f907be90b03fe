use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use codenav::lsp::{LanguageClient, Position, Range, SourceLocation};
use codenav::navigation::{NavigationOptions, Navigator, SymbolMatcher};

/// Source files in a temporary directory.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Write `content` to `name` and return the absolute path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        self.write_bytes(name, content.as_bytes())
    }

    /// Like [`write`](Self::write), for content that need not be UTF-8.
    pub fn write_bytes(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(&path, content).expect("Failed to write fixture");
        path
    }

    /// A path inside the workspace that does not exist.
    pub fn missing(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// Zero-width location at a 0-based line and character.
pub fn at(path: &Path, line: u32, character: u32) -> SourceLocation {
    let position = Position::new(line, character);
    SourceLocation::from_path(path, Range::new(position, position))
}

pub fn navigator<C: LanguageClient>(client: Arc<C>, context_lines: usize) -> Navigator<C> {
    Navigator::new(
        client,
        NavigationOptions {
            context_lines,
            matcher: SymbolMatcher::default(),
        },
    )
}

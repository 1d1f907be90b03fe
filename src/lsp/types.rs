//! Transport-agnostic location and symbol types.
//!
//! Everything here is 0-indexed. Conversion to the 1-indexed form users see
//! happens only in the renderer and at the navigator's entry points.

use serde::Serialize;
use std::fmt;
use std::path::Path;
use url::Url;

/// A zero-based line/character position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }

    /// Build a position from user-facing 1-indexed coordinates.
    ///
    /// Returns `None` when either coordinate is below 1.
    pub fn from_one_based(line: u32, column: u32) -> Option<Self> {
        if line == 0 || column == 0 {
            return None;
        }
        Some(Self::new(line - 1, column - 1))
    }
}

/// A span between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Whether `position` falls inside this range, both ends inclusive.
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }

    /// Number of lines the range spans, used to pick the innermost of nested ranges.
    pub fn line_span(&self) -> u32 {
        self.end.line.saturating_sub(self.start.line)
    }
}

/// A file identifier plus a range inside that file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SourceLocation {
    pub uri: String,
    pub range: Range,
}

impl SourceLocation {
    pub fn new(uri: impl Into<String>, range: Range) -> Self {
        Self {
            uri: uri.into(),
            range,
        }
    }

    /// Build a location for a filesystem path, encoding it as a `file://` URI.
    pub fn from_path(path: &Path, range: Range) -> Self {
        let uri = Url::from_file_path(path)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| format!("file://{}", path.display()));
        Self::new(uri, range)
    }

    /// The normalized file identifier: a plain path for `file://` URIs,
    /// the URI itself otherwise.
    pub fn file_id(&self) -> String {
        match Url::parse(&self.uri) {
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_else(|_| self.uri.trim_start_matches("file://").to_string()),
            _ => self.uri.trim_start_matches("file://").to_string(),
        }
    }
}

impl From<lsp_types::Position> for Position {
    fn from(p: lsp_types::Position) -> Self {
        Self::new(p.line, p.character)
    }
}

impl From<Position> for lsp_types::Position {
    fn from(p: Position) -> Self {
        lsp_types::Position::new(p.line, p.character)
    }
}

impl From<lsp_types::Range> for Range {
    fn from(r: lsp_types::Range) -> Self {
        Self::new(r.start.into(), r.end.into())
    }
}

impl From<lsp_types::Location> for SourceLocation {
    fn from(loc: lsp_types::Location) -> Self {
        Self::new(loc.uri.to_string(), loc.range.into())
    }
}

/// Kind tag of an indexed symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SymbolKind {
    File,
    Module,
    Namespace,
    Package,
    Class,
    Method,
    Property,
    Field,
    Constructor,
    Enum,
    Interface,
    Function,
    Variable,
    Constant,
    Struct,
    EnumMember,
    TypeParameter,
    Other,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Module => "Module",
            Self::Namespace => "Namespace",
            Self::Package => "Package",
            Self::Class => "Class",
            Self::Method => "Method",
            Self::Property => "Property",
            Self::Field => "Field",
            Self::Constructor => "Constructor",
            Self::Enum => "Enum",
            Self::Interface => "Interface",
            Self::Function => "Function",
            Self::Variable => "Variable",
            Self::Constant => "Constant",
            Self::Struct => "Struct",
            Self::EnumMember => "EnumMember",
            Self::TypeParameter => "TypeParameter",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<lsp_types::SymbolKind> for SymbolKind {
    fn from(kind: lsp_types::SymbolKind) -> Self {
        use lsp_types::SymbolKind as K;
        match kind {
            K::FILE => Self::File,
            K::MODULE => Self::Module,
            K::NAMESPACE => Self::Namespace,
            K::PACKAGE => Self::Package,
            K::CLASS => Self::Class,
            K::METHOD => Self::Method,
            K::PROPERTY => Self::Property,
            K::FIELD => Self::Field,
            K::CONSTRUCTOR => Self::Constructor,
            K::ENUM => Self::Enum,
            K::INTERFACE => Self::Interface,
            K::FUNCTION => Self::Function,
            K::VARIABLE => Self::Variable,
            K::CONSTANT => Self::Constant,
            K::STRUCT => Self::Struct,
            K::ENUM_MEMBER => Self::EnumMember,
            K::TYPE_PARAMETER => Self::TypeParameter,
            _ => Self::Other,
        }
    }
}

/// An entry returned by a workspace-symbol query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolCandidate {
    pub name: String,
    pub kind: SymbolKind,
    pub container: Option<String>,
    pub location: SourceLocation,
}

impl SymbolCandidate {
    pub fn new(name: impl Into<String>, kind: SymbolKind, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            kind,
            container: None,
            location,
        }
    }

    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = Some(container.into());
        self
    }

    pub fn is_method(&self) -> bool {
        self.kind == SymbolKind::Method
    }
}

/// A definition link: the target file and the full target range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionLink {
    pub target_uri: String,
    pub target_range: Range,
    pub target_selection_range: Range,
}

/// The shapes a definition request can answer with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DefinitionResponse {
    #[default]
    Empty,
    Scalar(SourceLocation),
    Array(Vec<SourceLocation>),
    Links(Vec<DefinitionLink>),
}

impl DefinitionResponse {
    /// Flatten into plain locations. Links contribute their target range.
    pub fn into_locations(self) -> Vec<SourceLocation> {
        match self {
            Self::Empty => Vec::new(),
            Self::Scalar(location) => vec![location],
            Self::Array(locations) => locations,
            Self::Links(links) => links
                .into_iter()
                .map(|link| SourceLocation::new(link.target_uri, link.target_range))
                .collect(),
        }
    }
}

impl From<Option<lsp_types::GotoDefinitionResponse>> for DefinitionResponse {
    fn from(response: Option<lsp_types::GotoDefinitionResponse>) -> Self {
        use lsp_types::GotoDefinitionResponse as R;
        match response {
            None => Self::Empty,
            Some(R::Scalar(loc)) => Self::Scalar(loc.into()),
            Some(R::Array(locs)) => Self::Array(locs.into_iter().map(Into::into).collect()),
            Some(R::Link(links)) => Self::Links(
                links
                    .into_iter()
                    .map(|link| DefinitionLink {
                        target_uri: link.target_uri.to_string(),
                        target_range: link.target_range.into(),
                        target_selection_range: link.target_selection_range.into(),
                    })
                    .collect(),
            ),
        }
    }
}

/// The body of an enclosing definition together with its expanded range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullDefinition {
    pub text: String,
    pub location: SourceLocation,
}

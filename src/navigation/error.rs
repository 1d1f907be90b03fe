use std::path::PathBuf;
use thiserror::Error;

use crate::lsp::LspError;

/// Failures that abort a whole navigation query.
///
/// Problems with individual result files never surface here; they are logged
/// and reported inline instead.
#[derive(Error, Debug)]
pub enum NavigationError {
    /// Line or column below 1.
    #[error("Invalid position {line}:{column}: lines and columns start at 1")]
    InvalidPosition { line: u32, column: u32 },

    /// The file named in a position query could not be opened.
    #[error("Could not open file {}: {source}", .path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: LspError,
    },

    /// The references request failed.
    #[error("Failed to get references: {0}")]
    References(#[source] LspError),

    /// The definition request failed.
    #[error("Failed to get definition: {0}")]
    Definition(#[source] LspError),

    /// The workspace-symbol request failed.
    #[error("Failed to fetch symbol: {0}")]
    Symbol(#[source] LspError),
}

impl NavigationError {
    /// Whether the caller supplied bad input, as opposed to a server failure.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidPosition { .. })
    }
}

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "codenav")]
#[command(author, version, about = "Language-server backed code navigation CLI and MCP server")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Workspace root (default: current directory)
    #[arg(short, long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Language server executable, overriding lsp.command
    #[arg(long, global = true)]
    pub lsp: Option<String>,

    /// Argument for the language server; repeat for several
    #[arg(long = "lsp-arg", global = true, allow_hyphen_values = true)]
    pub lsp_args: Vec<String>,
}

impl GlobalArgs {
    /// Overlay command-line settings on a loaded config.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(command) = &self.lsp {
            config.lsp.command = command.clone();
            config.lsp.args.clear();
        }
        if !self.lsp_args.is_empty() {
            config.lsp.args = self.lsp_args.clone();
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default .codenav/config.toml in the workspace
    Init,

    /// Start the MCP server on stdio
    Serve,

    /// Find references to a symbol by name
    References {
        /// Symbol name, optionally qualified as Type.method
        symbol: String,
    },

    /// Find references to the symbol at a position
    ReferencesAt {
        /// File containing the symbol
        file: PathBuf,

        /// Line number (1-based)
        line: u32,

        /// Column number (1-based)
        column: u32,

        /// Include the declaration itself
        #[arg(long)]
        include_declaration: bool,
    },

    /// Show the definition of the symbol at a position
    Definition {
        /// File containing the symbol
        file: PathBuf,

        /// Line number (1-based)
        line: u32,

        /// Column number (1-based)
        column: u32,
    },

    /// Print the full definition of a symbol by name
    ReadDefinition {
        /// Symbol name, optionally qualified as Type.method
        symbol: String,
    },
}

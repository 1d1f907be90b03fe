pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod lsp;
pub mod mcp;
pub mod navigation;

pub use config::Config;
pub use navigation::{NavigationError, NavigationOptions, Navigator};

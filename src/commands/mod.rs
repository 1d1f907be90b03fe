//! Subcommand implementations.
//!
//! Every query command starts its own language server for the workspace and
//! shuts it down again when done.

pub mod init;
pub mod query;
pub mod serve;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::lsp::{LanguageClient, StdioClient};
use crate::navigation::{NavigationOptions, Navigator};

/// A running language server and the navigator built on it.
pub struct Session {
    client: Arc<StdioClient>,
    navigator: Arc<Navigator<dyn LanguageClient>>,
}

impl Session {
    pub async fn start(root: &Path, config: &Config) -> Result<Self> {
        let client = Arc::new(
            StdioClient::start(&config.lsp, root)
                .await
                .with_context(|| format!("Failed to start language server '{}'", config.lsp.command))?,
        );

        let options = NavigationOptions::from(&config.navigation);
        info!(
            "Navigator ready: {} context lines, separators {:?}",
            options.context_lines,
            options.matcher.separators()
        );

        let shared: Arc<dyn LanguageClient> = client.clone();
        Ok(Self {
            client,
            navigator: Arc::new(Navigator::new(shared, options)),
        })
    }

    pub fn navigator(&self) -> &Arc<Navigator<dyn LanguageClient>> {
        &self.navigator
    }

    /// Politely stop the server. Failures are logged, not returned.
    pub async fn close(self) {
        if let Err(e) = self.client.shutdown().await {
            tracing::warn!("Language server did not shut down cleanly: {}", e);
        }
    }
}

use anyhow::{bail, Result};
use std::path::Path;
use tracing::info;

use crate::Config;

/// Write `config` to `.codenav/config.toml` under `root`, refusing to overwrite.
pub fn run(root: &Path, config: &Config) -> Result<()> {
    if Config::is_initialized(root) {
        bail!(
            "codenav is already configured in {}",
            Config::config_path(root).display()
        );
    }

    config.save(root)?;

    let path = Config::config_path(root);
    info!("Wrote default configuration to {}", path.display());
    println!("Created {}", path.display());
    println!("\nNext steps:");
    println!("  1. Set lsp.command and lsp.args for your language server");
    println!("  2. Run 'codenav serve' to start the MCP server");

    Ok(())
}

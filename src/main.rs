use anyhow::{Context, Result};
use clap::Parser;

use codenav::cli::{Cli, Commands};
use codenav::commands::query::{self, Query};
use codenav::commands::{init, serve};
use codenav::config::Config;
use codenav::logging::{init_early_logging, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let root = match &cli.global.workspace {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    let root = match root.canonicalize() {
        Ok(root) => root,
        Err(e) => {
            init_early_logging();
            tracing::error!("Workspace {} is not accessible: {}", root.display(), e);
            return Err(e).with_context(|| format!("Invalid workspace {}", root.display()));
        }
    };

    let config = match Config::load(&root) {
        Ok(config) => config,
        Err(e) => {
            init_early_logging();
            tracing::error!("{:#}", e);
            return Err(e);
        }
    };
    let config = cli.global.apply(config).with_env_overrides();

    // The guard MUST be held until program exit to ensure logs are flushed
    let _logging_guard = init_logging(&config.logging, &root)?;

    tracing::info!("codenav starting up");
    tracing::debug!("Workspace root: {}", root.display());

    match cli.command {
        Commands::Init => {
            // Environment overrides are per-run and stay out of the file.
            init::run(&root, &cli.global.apply(Config::default()))?;
        }
        Commands::Serve => {
            serve::run(&root, &config).await?;
        }
        Commands::References { symbol } => {
            query::run(&root, &config, Query::References(&symbol)).await?;
        }
        Commands::ReferencesAt {
            file,
            line,
            column,
            include_declaration,
        } => {
            let query = Query::ReferencesAt {
                file: &file,
                line,
                column,
                include_declaration,
            };
            query::run(&root, &config, query).await?;
        }
        Commands::Definition { file, line, column } => {
            let query = Query::Definition {
                file: &file,
                line,
                column,
            };
            query::run(&root, &config, query).await?;
        }
        Commands::ReadDefinition { symbol } => {
            query::run(&root, &config, Query::ReadDefinition(&symbol)).await?;
        }
    }

    Ok(())
}

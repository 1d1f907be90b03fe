//! One-shot navigation queries printed to stdout.

use anyhow::Result;
use std::path::Path;

use super::Session;
use crate::config::Config;

/// A single navigation request from the command line.
#[derive(Debug, Clone)]
pub enum Query<'a> {
    References(&'a str),
    ReferencesAt {
        file: &'a Path,
        line: u32,
        column: u32,
        include_declaration: bool,
    },
    Definition {
        file: &'a Path,
        line: u32,
        column: u32,
    },
    ReadDefinition(&'a str),
}

pub async fn run(root: &Path, config: &Config, query: Query<'_>) -> Result<()> {
    let session = Session::start(root, config).await?;
    let navigator = session.navigator().clone();

    let report = match query {
        Query::References(symbol) => navigator.find_references(symbol).await,
        Query::ReferencesAt {
            file,
            line,
            column,
            include_declaration,
        } => {
            navigator
                .find_references_at_position(&root.join(file), line, column, include_declaration)
                .await
        }
        Query::Definition { file, line, column } => {
            navigator.go_to_definition(&root.join(file), line, column).await
        }
        Query::ReadDefinition(symbol) => navigator.read_definition(symbol).await,
    };

    session.close().await;
    println!("{}", report?);
    Ok(())
}

use std::sync::Arc;

use codenav::lsp::{
    DefinitionLink, DefinitionResponse, Position, Range, SymbolCandidate, SymbolKind,
};
use codenav::navigation::NavigationError;

use crate::helpers::mock_client::MockLanguageClient;
use crate::helpers::test_utils::{at, navigator, Workspace};

const LIB: &str = "package lib\n\nfunc Add(a, b int) int {\n\treturn a + b\n}\n";
const MAIN: &str = "package main\n\nfunc main() {\n\tlib.Add(1, 2)\n}\n";
const SERVER: &str = "package srv\n\nfunc (s *Server) Start() {\n\ts.run()\n}\n";
const TIMER: &str = "package srv\n\nfunc (t *Timer) Start() {\n\tt.tick()\n}\n";

#[tokio::test]
async fn test_go_to_definition_shows_context() {
    let ws = Workspace::new();
    let lib = ws.write("lib.go", LIB);
    let main = ws.write("main.go", MAIN);
    let target = at(&lib, 2, 5);

    let client = Arc::new(
        MockLanguageClient::new()
            .with_definition(&main, Position::new(3, 5), DefinitionResponse::Scalar(target.clone()))
            .with_definition_end(&target, 4),
    );
    let nav = navigator(client.clone(), 1);

    let report = nav.go_to_definition(&main, 4, 6).await.unwrap();

    assert_eq!(
        report,
        format!(
            "---\n\nFile: {}\nDefinition at: L3:C1 - L5:C2\n\n2|\n3|func Add(a, b int) int {{\n4|\treturn a + b\n5|}}\n6|\n",
            lib.display()
        )
    );
    assert_eq!(client.opened(), vec![main, lib]);
}

#[tokio::test]
async fn test_go_to_definition_follows_links() {
    let ws = Workspace::new();
    let lib = ws.write("lib.go", LIB);
    let main = ws.write("main.go", MAIN);
    let target = at(&lib, 2, 0);

    let link = DefinitionLink {
        target_uri: target.uri.clone(),
        target_range: target.range,
        target_selection_range: Range::new(Position::new(2, 5), Position::new(2, 8)),
    };
    let client = Arc::new(
        MockLanguageClient::new()
            .with_definition(&main, Position::new(3, 5), DefinitionResponse::Links(vec![link]))
            .with_definition_end(&target, 4),
    );
    let nav = navigator(client, 0);

    let report = nav.go_to_definition(&main, 4, 6).await.unwrap();

    assert!(report.contains("Definition at: L3:C1 - L5:C2\n\n3|func Add"));
    assert!(report.ends_with("5|}\n"));
}

#[tokio::test]
async fn test_go_to_definition_renders_every_target() {
    let ws = Workspace::new();
    let lib = ws.write("lib.go", LIB);
    let main = ws.write("main.go", MAIN);

    let client = Arc::new(MockLanguageClient::new().with_definition(
        &main,
        Position::new(3, 5),
        DefinitionResponse::Array(vec![at(&main, 2, 5), at(&lib, 2, 5), at(&lib, 2, 5)]),
    ));
    let nav = navigator(client, 0);

    let report = nav.go_to_definition(&main, 4, 6).await.unwrap();

    let lib_block = format!("---\n\nFile: {}\nDefinition at: L3:C1 - L3:C25\n\n3|func Add(a, b int) int {{\n", lib.display());
    let main_block = format!("---\n\nFile: {}\nDefinition at: L3:C1 - L3:C14\n\n3|func main() {{\n", main.display());
    assert_eq!(report, format!("{}\n{}", lib_block, main_block));
}

#[tokio::test]
async fn test_no_definition_found() {
    let ws = Workspace::new();
    let main = ws.write("main.go", MAIN);
    let nav = navigator(Arc::new(MockLanguageClient::new()), 5);

    let report = nav.go_to_definition(&main, 1, 1).await.unwrap();
    assert_eq!(report, format!("No definition found at {}:1:1", main.display()));
}

#[tokio::test]
async fn test_unreadable_definition_target() {
    let ws = Workspace::new();
    let main = ws.write("main.go", MAIN);
    let gone = ws.missing("vendor/gone.go");

    let client = Arc::new(MockLanguageClient::new().with_definition(
        &main,
        Position::new(3, 5),
        DefinitionResponse::Scalar(at(&gone, 10, 5)),
    ));
    let nav = navigator(client, 5);

    let report = nav.go_to_definition(&main, 4, 6).await.unwrap();
    assert_eq!(report, format!("Could not read definition at {}:4:6", main.display()));
}

#[tokio::test]
async fn test_go_to_definition_rejects_zero_column() {
    let ws = Workspace::new();
    let main = ws.write("main.go", MAIN);
    let nav = navigator(Arc::new(MockLanguageClient::new()), 5);

    let err = nav.go_to_definition(&main, 4, 0).await.unwrap_err();
    assert!(matches!(err, NavigationError::InvalidPosition { line: 4, column: 0 }));
}

#[tokio::test]
async fn test_read_definition_by_qualified_name() {
    let ws = Workspace::new();
    let server = ws.write("server.go", SERVER);
    let timer = ws.write("timer.go", TIMER);
    let server_start = at(&server, 2, 17);
    let timer_start = at(&timer, 2, 16);

    let client = Arc::new(
        MockLanguageClient::new()
            .with_symbol(
                SymbolCandidate::new("Start", SymbolKind::Method, server_start.clone())
                    .with_container("Server"),
            )
            .with_symbol(
                SymbolCandidate::new("Start", SymbolKind::Method, timer_start.clone())
                    .with_container("Timer"),
            )
            .with_definition_end(&server_start, 4)
            .with_definition_end(&timer_start, 4),
    );
    let nav = navigator(client.clone(), 5);

    let report = nav.read_definition("Server.Start").await.unwrap();

    assert_eq!(
        report,
        format!(
            "---\n\nSymbol: Start\nFile: {}\nKind: Method\nContainer Name: Server\n\
             Range: L3:C1 - L5:C2\n\n3|func (s *Server) Start() {{\n4|\ts.run()\n5|}}\n",
            server.display()
        )
    );
    assert_eq!(client.symbol_queries(), vec!["Server.Start"]);
    assert_eq!(client.opened(), vec![server]);
}

#[tokio::test]
async fn test_read_definition_bare_name_returns_all_matches() {
    let ws = Workspace::new();
    let server = ws.write("server.go", SERVER);
    let timer = ws.write("timer.go", TIMER);

    let client = Arc::new(
        MockLanguageClient::new()
            .with_symbol(SymbolCandidate::new("Server.Start", SymbolKind::Method, at(&server, 2, 17)))
            .with_symbol(SymbolCandidate::new("Timer.Start", SymbolKind::Method, at(&timer, 2, 16)))
            .with_symbol(SymbolCandidate::new("StartAll", SymbolKind::Function, at(&timer, 0, 0))),
    );
    let nav = navigator(client, 5);

    let report = nav.read_definition("Start").await.unwrap();

    let server_block = format!(
        "---\n\nSymbol: Server.Start\nFile: {}\nKind: Method\nRange: L3:C1 - L3:C27\n\n3|func (s *Server) Start() {{\n",
        server.display()
    );
    let timer_block = format!(
        "---\n\nSymbol: Timer.Start\nFile: {}\nKind: Method\nRange: L3:C1 - L3:C26\n\n3|func (t *Timer) Start() {{\n",
        timer.display()
    );
    assert_eq!(report, format!("{}\n{}", server_block, timer_block));
}

#[tokio::test]
async fn test_read_definition_skips_failed_candidates() {
    let ws = Workspace::new();
    let server = ws.write("server.go", SERVER);
    let locked = ws.write("locked.go", SERVER);
    let gone = ws.missing("gone.go");

    let client = Arc::new(
        MockLanguageClient::new()
            .with_symbol(SymbolCandidate::new("Config", SymbolKind::Struct, at(&gone, 0, 5)))
            .with_symbol(SymbolCandidate::new("Config", SymbolKind::Struct, at(&locked, 0, 5)))
            .with_symbol(SymbolCandidate::new("Config", SymbolKind::Struct, at(&server, 0, 0)))
            .unopenable(&locked),
    );
    let nav = navigator(client, 5);

    let report = nav.read_definition("Config").await.unwrap();

    assert_eq!(report.matches("Symbol: Config").count(), 1);
    assert!(report.contains(&format!("File: {}\nKind: Struct\n", server.display())));
    assert!(report.ends_with("1|package srv\n"));
}

#[tokio::test]
async fn test_read_definition_not_found() {
    let nav = navigator(Arc::new(MockLanguageClient::new()), 5);
    assert_eq!(nav.read_definition("Missing").await.unwrap(), "Missing not found");
}

#[tokio::test]
async fn test_read_definition_symbol_failure() {
    let nav = navigator(Arc::new(MockLanguageClient::new().failing_symbols()), 5);
    let err = nav.read_definition("Server.Start").await.unwrap_err();
    assert!(matches!(err, NavigationError::Symbol(_)));
}

#[tokio::test]
async fn test_go_to_definition_request_failure_aborts() {
    let ws = Workspace::new();
    let main = ws.write("main.go", MAIN);
    let client = Arc::new(MockLanguageClient::new().failing_definition());
    let nav = navigator(client.clone(), 1);

    let err = nav.go_to_definition(&main, 4, 6).await.unwrap_err();

    assert!(matches!(err, NavigationError::Definition(_)));
    assert!(err.to_string().starts_with("Failed to get definition"));
    assert!(!err.is_invalid_argument());
    assert_eq!(client.opened(), vec![main]);
}

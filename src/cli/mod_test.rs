use super::{Cli, Commands};
use clap::Parser;

#[test]
fn test_serve_defaults_leave_overrides_unset() {
    let cli = Cli::try_parse_from(["todo-mcp", "serve"]).unwrap();

    let Commands::Serve {
        host,
        port,
        database_url,
        base_url,
        verbose,
        docs,
    } = cli.command;
    assert!(host.is_none());
    assert!(port.is_none());
    assert!(database_url.is_none());
    assert!(base_url.is_none());
    assert_eq!(verbose, 0);
    assert!(!docs);
}

#[test]
fn test_serve_parses_flags() {
    let cli = Cli::try_parse_from([
        "todo-mcp",
        "serve",
        "--host",
        "127.0.0.1",
        "-p",
        "8080",
        "--database-url",
        "sqlite://todos.db",
        "--base-url",
        "https://todos.example.com",
        "-vv",
        "--docs",
    ])
    .unwrap();

    let Commands::Serve {
        host,
        port,
        database_url,
        base_url,
        verbose,
        docs,
    } = cli.command;
    assert_eq!(host.unwrap().to_string(), "127.0.0.1");
    assert_eq!(port, Some(8080));
    assert_eq!(database_url.as_deref(), Some("sqlite://todos.db"));
    assert_eq!(base_url.as_deref(), Some("https://todos.example.com"));
    assert_eq!(verbose, 2);
    assert!(docs);
}

#[test]
fn test_invalid_port_is_rejected() {
    assert!(Cli::try_parse_from(["todo-mcp", "serve", "--port", "99999"]).is_err());
}

#[test]
fn test_subcommand_is_required() {
    assert!(Cli::try_parse_from(["todo-mcp"]).is_err());
}

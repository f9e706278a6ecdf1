// `run()` starts a long-running server and is covered by the api and mcp
// tests. These tests cover how flags, env vars and defaults combine.

use super::serve::{DATABASE_URL_ENV, ServeArgs, resolve_config, resolve_database_url};
use crate::api::{BASE_URL_ENV, PORT_ENV};
use serial_test::serial;
use std::env;
use std::net::IpAddr;

#[test]
#[serial]
fn test_resolve_config_defaults() {
    let config = resolve_config(&ServeArgs::default());

    assert_eq!(config.host.to_string(), "0.0.0.0");
    assert_eq!(config.port, 3000);
    assert_eq!(config.resolved_base_url(), "http://localhost:3000");
    assert_eq!(config.verbosity, 0);
    assert!(!config.enable_docs);
}

#[test]
#[serial]
fn test_resolve_config_flags_override_env() {
    unsafe {
        env::set_var(PORT_ENV, "4100");
        env::set_var(BASE_URL_ENV, "https://env.example.com");
    }

    let config = resolve_config(&ServeArgs {
        host: Some("127.0.0.1".parse::<IpAddr>().unwrap()),
        port: Some(8080),
        verbosity: 1,
        enable_docs: true,
        ..Default::default()
    });

    assert_eq!(config.host.to_string(), "127.0.0.1");
    assert_eq!(config.port, 8080, "flag should override TODO_PORT");
    assert_eq!(
        config.resolved_base_url(),
        "https://env.example.com",
        "unset flag should keep TODO_BASE_URL"
    );
    assert_eq!(config.verbosity, 1);
    assert!(config.enable_docs);

    // Cleanup
    unsafe {
        env::remove_var(PORT_ENV);
        env::remove_var(BASE_URL_ENV);
    }
}

#[test]
#[serial]
fn test_resolve_database_url_precedence() {
    unsafe {
        env::set_var(DATABASE_URL_ENV, "sqlite://env.db");
    }

    assert_eq!(
        resolve_database_url(Some("sqlite://flag.db".to_string())).as_deref(),
        Some("sqlite://flag.db")
    );
    assert_eq!(resolve_database_url(None).as_deref(), Some("sqlite://env.db"));

    // Cleanup
    unsafe {
        env::remove_var(DATABASE_URL_ENV);
    }

    assert!(resolve_database_url(None).is_none());
    assert!(resolve_database_url(Some("  ".to_string())).is_none());
}

//! Unit tests for CLI commands

use crate::cli::{format_operations, Cli, Commands};
use crate::spec::{Operation, SchemaNode};
use clap::Parser;
use http::Method;
use std::path::PathBuf;

#[test]
fn test_generate_command_with_defaults() {
    let cli = Cli::try_parse_from(["hanamigen", "generate", "--input-file", "openapi.yaml"]).unwrap();

    match cli.command {
        Commands::Generate {
            input_file,
            app_name,
            output_dir,
            config,
            templates,
            dry_run,
        } => {
            assert_eq!(input_file, PathBuf::from("openapi.yaml"));
            assert_eq!(app_name, None);
            assert_eq!(output_dir, None);
            assert_eq!(config, None);
            assert_eq!(templates, None);
            assert!(!dry_run);
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_generate_command_with_flags() {
    let cli = Cli::try_parse_from([
        "hanamigen",
        "generate",
        "-i",
        "api.json",
        "-a",
        "Bookshelf",
        "-o",
        "app",
        "--templates",
        "tpl",
        "--dry-run",
    ])
    .unwrap();

    match cli.command {
        Commands::Generate {
            input_file,
            app_name,
            output_dir,
            templates,
            dry_run,
            ..
        } => {
            assert_eq!(input_file, PathBuf::from("api.json"));
            assert_eq!(app_name.as_deref(), Some("Bookshelf"));
            assert_eq!(output_dir, Some(PathBuf::from("app")));
            assert_eq!(templates, Some(PathBuf::from("tpl")));
            assert!(dry_run);
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_spec_alias() {
    let cli = Cli::try_parse_from(["hanamigen", "inspect", "--spec", "openapi.yaml"]).unwrap();
    match cli.command {
        Commands::Inspect { input_file } => {
            assert_eq!(input_file, PathBuf::from("openapi.yaml"));
        }
        _ => panic!("Expected Inspect command"),
    }
}

#[test]
fn test_missing_input_file_is_a_usage_error() {
    let err = Cli::try_parse_from(["hanamigen", "generate"]).unwrap_err();
    assert_eq!(
        err.kind(),
        clap::error::ErrorKind::MissingRequiredArgument
    );
}

#[test]
fn test_format_operations_table() {
    let operations = vec![Operation {
        method: Method::GET,
        path: "/books/{bookId}".to_string(),
        module_name: "books".to_string(),
        operation_id: "GetBookById".to_string(),
        request_body_schema: None,
        success_response_schema: SchemaNode::Unsupported(None),
        parameters: Vec::new(),
    }];
    let table = format_operations(&operations);
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines[0], "METHOD  PATH            MODULE  OPERATION");
    assert_eq!(lines[1], "GET     /books/:bookId  books   GetBookById");
}

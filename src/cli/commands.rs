use crate::config::{merge_options, resolve_config, CliOverrides};
use crate::error::GenerateError;
use crate::generator::{generate, to_rack_path};
use crate::spec::{extract_operations, load_spec, Operation};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface for hanamigen
///
/// Generates Hanami routes, actions, service stubs and dry-validation
/// contracts from an OpenAPI specification.
#[derive(Parser, Debug)]
#[command(name = "hanamigen")]
#[command(version, about = "Hanami code generator for OpenAPI specifications", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate Hanami sources from an OpenAPI spec
    ///
    /// Routes, actions, contracts and schemas are regenerated on every run.
    /// Service stubs are written once and never overwritten.
    Generate {
        /// Path to the OpenAPI specification file (YAML or JSON)
        #[arg(short, long, visible_alias = "spec")]
        input_file: PathBuf,

        /// Ruby application module name (default: HanamiApp)
        #[arg(short, long)]
        app_name: Option<String>,

        /// Output directory (default: gen)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Path to hanamigen.toml.
        /// If not provided, will auto-detect alongside the OpenAPI spec
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory with template overrides (routes.rb.j2, action.rb.j2, ...)
        #[arg(long)]
        templates: Option<PathBuf>,

        /// Perform a dry run: report what would be written without writing files
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// List the operations extracted from a spec
    Inspect {
        /// Path to the OpenAPI specification file (YAML or JSON)
        #[arg(short, long, visible_alias = "spec")]
        input_file: PathBuf,
    },
}

/// Format operations as an aligned table.
pub fn format_operations(operations: &[Operation]) -> String {
    let rows: Vec<[String; 4]> = operations
        .iter()
        .map(|op| {
            [
                op.method.to_string(),
                to_rack_path(&op.path),
                op.module_name.clone(),
                op.operation_id.clone(),
            ]
        })
        .collect();
    let header = ["METHOD", "PATH", "MODULE", "OPERATION"].map(String::from);

    let mut widths = header.clone().map(|h| h.len());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    for row in std::iter::once(&header).chain(&rows) {
        let line = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Run a parsed command.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            input_file,
            app_name,
            output_dir,
            config,
            templates,
            dry_run,
        } => {
            let file_config = resolve_config(config.as_deref(), &input_file)?;
            let options = merge_options(
                &input_file,
                CliOverrides {
                    app_name,
                    output_dir,
                    templates_dir: templates,
                    dry_run,
                },
                file_config,
            );
            let report = generate(&options)?;

            if dry_run {
                for path in &report.files.written {
                    println!("would write  {}", path.display());
                }
                for path in &report.files.skipped {
                    println!("would skip   {}", path.display());
                }
            }
            Ok(())
        }
        Commands::Inspect { input_file } => {
            let graph = load_spec(&input_file)?;
            let operations = extract_operations(&graph).map_err(GenerateError::from)?;
            print!("{}", format_operations(&operations));
            Ok(())
        }
    }
}

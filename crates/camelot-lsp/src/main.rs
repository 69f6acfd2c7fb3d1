//! camelot-lsp - Main entry point

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use camelot_lsp::ServerOptions;
use camelot_lsp_core::OutputFormat;

#[derive(Parser)]
#[command(name = "camelot-lsp")]
#[command(version)]
#[command(about = "Language server publishing camelot findings as diagnostics", long_about = None)]
struct Cli {
    /// Analyzer command to use when the client does not set `camelot.path`
    #[arg(long, global = true, value_name = "CMD")]
    analyzer: Option<String>,

    /// Output mode requested from camelot (json or ta)
    #[arg(long, global = true, default_value_t = OutputFormat::Structured)]
    output_format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the language server over stdio (the default)
    Lsp,

    /// Run camelot once on a file and print the resulting diagnostics as JSON
    Check {
        /// File to check
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging. stdout carries JSON-RPC, so logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "camelot_lsp=info,camelot_lsp_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let options = ServerOptions {
        analyzer: cli.analyzer,
        output_format: cli.output_format,
    };

    match cli.command.unwrap_or(Commands::Lsp) {
        Commands::Lsp => serve(options),
        Commands::Check { file } => check(options, &file),
    }
}

fn serve(options: ServerOptions) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async {
        camelot_lsp::run_server(options).await;
    });

    Ok(())
}

fn check(options: ServerOptions, file: &std::path::Path) -> Result<()> {
    let path = std::fs::canonicalize(file)
        .with_context(|| format!("cannot resolve {}", file.display()))?;
    let command = options.analyzer_config().resolve();

    let runtime = tokio::runtime::Runtime::new()?;
    let report =
        runtime.block_on(camelot_lsp_core::validate(&command, options.output_format, &path));
    if report.invocation_failed {
        tracing::warn!("camelot did not produce usable output for {}", path.display());
    }

    println!("{}", serde_json::to_string_pretty(&report.diagnostics)?);
    Ok(())
}

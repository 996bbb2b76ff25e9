mod commands;
mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::ParamFormat;
use config::{parse_mapping, Config};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sieve", version)]
#[command(about = "Compile rule files to SQL or check records against them", long_about = None)]
struct Cli {
    /// Path to a YAML config file for `sql` (table, columns, column_mapping)
    #[arg(long, global = true, env = "SIEVE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the SQL query and parameters for a rule file
    Sql {
        /// Rule file (.json, .yaml or .yml)
        rules: PathBuf,

        /// Table to select from
        #[arg(long, env = "SIEVE_TABLE")]
        table: Option<String>,

        /// Columns to select, comma-separated (default: *)
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Rename a rule field to a column, as logical=physical (repeatable)
        #[arg(long = "map", value_parser = parse_mapping)]
        mappings: Vec<(String, String)>,

        /// Output format for the parameters
        #[arg(long, value_enum, default_value = "json")]
        format: ParamFormat,
    },
    /// Check JSON records against a rule file
    Check {
        /// Rule file (.json, .yaml or .yml)
        rules: PathBuf,

        /// JSON array of objects, or one JSON object per line
        records: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

/// Runs a subcommand. `Ok(false)` means some record failed its checks.
fn run(cli: Cli) -> Result<bool> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Sql {
            rules,
            table,
            columns,
            mappings,
            format,
        } => {
            let criteria = sieve_rules::load_rules(&rules)
                .with_context(|| format!("Failed to load rules: {}", rules.display()))?;
            let config = Config::load_optional(cli.config.as_deref())?
                .with_overrides(table, columns, mappings);
            commands::run_sql(&criteria, &config, format, &mut out)?;
            out.flush()?;
            Ok(true)
        }
        Commands::Check { rules, records } => {
            let criteria = sieve_rules::load_rules(&rules)
                .with_context(|| format!("Failed to load rules: {}", rules.display()))?;
            let records = commands::read_records(&records)?;
            let passed = commands::run_check(&criteria, &records, &mut out)?;
            out.flush()?;
            Ok(passed)
        }
    }
}

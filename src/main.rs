//! `vuege` command line: runs the table pipeline over a JSON row file.
//!
//! ```text
//! vuege query --data rows.json --search tver --filter population:greaterThan:100000 --sort name:desc
//! vuege stats --data rows.json --config vuege.toml
//! ```

#![forbid(unsafe_code)]

use clap::{ArgAction, Args, Parser, Subcommand};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use vuege::app::Command;
use vuege::observability::init_tracing;
use vuege::table::{ExportFormat, FilterConfig, SortConfig};
use vuege::{initialize, Config, Result, TableSession, VuegeError};

#[derive(Parser)]
#[command(name = "vuege")]
#[command(about = "Search, filter, sort and page JSON records", version)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    /// Write logs to this file instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the export of the requested page.
    Query {
        #[command(flatten)]
        view: ViewArgs,
        /// csv, json or excel.
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
    },
    /// Print table statistics as JSON.
    Stats {
        #[command(flatten)]
        view: ViewArgs,
    },
}

#[derive(Args)]
struct ViewArgs {
    /// JSON file holding an array of row objects.
    #[arg(long)]
    data: PathBuf,
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    search: Option<String>,
    /// Filter as `key:operator:value`; the value is read as JSON when it
    /// parses, otherwise as text. Repeatable.
    #[arg(long = "filter")]
    filters: Vec<FilterConfig>,
    /// Sort as `key` or `key:asc|desc`.
    #[arg(long)]
    sort: Option<SortConfig>,
    #[arg(long, default_value_t = 1)]
    page: usize,
    /// Overrides `page_size` from the configuration.
    #[arg(long)]
    page_size: Option<usize>,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Query { view, format } => {
            let mut session = open_session(&view, cli.verbose, cli.log_file)?;
            let export = session.export(format)?;
            println!("{}", export.body);
        }
        Commands::Stats { view } => {
            let session = open_session(&view, cli.verbose, cli.log_file)?;
            println!("{}", serde_json::to_string_pretty(&session.table().stats())?);
        }
    }
    Ok(())
}

fn open_session(view: &ViewArgs, verbose: u8, log_file: Option<PathBuf>) -> Result<TableSession<Value>> {
    let mut config = match &view.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    match verbose {
        0 => {}
        1 => config.trace_level = Some("debug".to_string()),
        _ => config.trace_level = Some("trace".to_string()),
    }
    if log_file.is_some() {
        config.log_file = log_file;
    }
    if let Some(page_size) = view.page_size {
        config.page_size = page_size.max(1);
    }
    init_tracing(&config)?;

    let rows = read_rows(&view.data)?;
    let mut session = initialize(&config, rows);

    if let Some(search) = &view.search {
        session.dispatch(&Command::Search(search.clone()))?;
    }
    for filter in &view.filters {
        session.dispatch(&Command::AddFilter(filter.clone()))?;
    }
    if let Some(sort) = &view.sort {
        session.dispatch(&Command::SetSort {
            key: sort.key.clone(),
            direction: sort.direction,
        })?;
    }
    if view.page > 1 {
        session.dispatch(&Command::GoToPage(view.page))?;
    }
    Ok(session)
}

fn read_rows(path: &Path) -> Result<Vec<Value>> {
    let text = fs::read_to_string(path)?;
    match serde_json::from_str(&text)? {
        Value::Array(rows) => Ok(rows),
        _ => Err(VuegeError::Config(format!(
            "{} must contain a JSON array of rows",
            path.display()
        ))),
    }
}

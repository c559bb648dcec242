use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::error;

use medichat::agent::SqlAgent;
use medichat::app::run_app;
use medichat::chart::BarSeries;
use medichat::component::RootComponent;
use medichat::config::{get_app_config_path, Config};
use medichat::store::{self, Initialized};
use medichat::terminal::with_terminal;
use medichat::{db, logger};

#[derive(Parser)]
#[command(name = "medichat", version, about = "Ask questions about a sample medical-records database")]
struct Cli {
    /// Store file, overriding the `database` entry of config.yaml
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Open the terminal UI, seeding the store first if it is missing (default)
    Tui,
    /// Rebuild the store from scratch with fresh sample data
    Init,
    /// Print sample rows joined across the tables
    Report,
    /// Print record counts and patient demographics
    Stats,
    /// Print the schema description handed to the query agent
    Schema,
    /// Run a read-only SQL query
    Query { sql: String },
}

fn print_initialized(init: &Initialized) {
    let s = init.summary;
    println!("Medical database initialized successfully with sample data");
    println!(
        "{} patients, {} doctors, {} medications, {} medical records, {} prescriptions\n",
        s.patients, s.doctors, s.medications, s.records, s.prescriptions
    );
    match &init.report {
        Some(report) => println!("{report}"),
        None => eprintln!("warning: sample report unavailable, see log for details"),
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(db) = cli.db {
        config.database = db;
    }
    let path = config.database_path()?;

    match cli.command.unwrap_or(Cmd::Tui) {
        Cmd::Tui => {
            if !path.exists() {
                eprintln!("Medical database not found. Initializing with sample data...");
            }
            if let Some(init) = store::ensure_store(&path)? {
                eprintln!(
                    "Database initialized! ({} records, {} prescriptions)",
                    init.summary.records, init.summary.prescriptions
                );
            }
            let agent = Arc::new(SqlAgent::new(&path, config.row_limit));
            let root = RootComponent::new(path, config.row_limit, agent);
            with_terminal(|term| run_app(term, root))?;
        }
        Cmd::Init => {
            let init = store::initialize_default(&path)
                .with_context(|| format!("failed to initialize {}", path.display()))?;
            print_initialized(&init);
        }
        Cmd::Report => {
            let conn = db::open_read_only(&path)?;
            println!("{}", store::sample_report(&conn)?);
        }
        Cmd::Stats => print!("{}", db::fetch_stats(&path)?),
        Cmd::Schema => print!("{}", db::schema_description(&path)?),
        Cmd::Query { sql } => {
            let records = db::run_query(&path, &sql, config.row_limit)?;
            print!("{records}");
            if let Some(chart) = BarSeries::from_records(&records) {
                print!("\n{}", chart.render_text(40));
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize file logging under the app config directory
    if let Ok(dir) = get_app_config_path() {
        if let Err(e) = logger::init(dir.join("medichat.log")) {
            eprintln!("warning: file logging disabled: {e}");
        }
    }

    let result = run(cli);
    if let Err(err) = &result {
        error!("fatal error: {err:#}");
    }
    result
}

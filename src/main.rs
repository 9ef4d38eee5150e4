use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;
use uuid::Uuid;

use carbon_audit_core::config::init_tracing;
use carbon_audit_core::export::{list_line, summary_lines, to_csv};
use carbon_audit_core::{
    compute_emissions, ActivityRecord, AuditStore, Config, EmissionFactor, FuelType, GridRegion,
    JsonFileAuditStore,
};

#[derive(Debug, Parser)]
#[command(name = "carbon-audit", about = "Scope 1/2/3 emissions from activity data")]
struct Cli {
    /// Store file, overrides CARBON_AUDIT_STORE.
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute emissions for a record file without saving it.
    Compute {
        record: PathBuf,
        /// Print the raw result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Compute and save a record; prints the new id.
    Save { record: PathBuf },
    /// Replace a saved record.
    Update { id: Uuid, record: PathBuf },
    Delete { id: Uuid },
    Show { id: Uuid },
    List,
    /// Write every saved audit as CSV.
    Export {
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print the fuel and grid factor tables.
    Factors,
}

fn read_record(path: &Path) -> Result<ActivityRecord, Box<dyn Error>> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn print_table<F: EmissionFactor>(title: &str) {
    println!("{title}");
    for f in F::ALL {
        println!(
            "  {:<18} {:<24} {} kg CO2e/{}",
            f.key(),
            f.label(),
            f.kg_co2e_per_unit(),
            f.unit()
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let mut config = Config::load()?;
    if let Some(store) = cli.store {
        config.store_path = store;
    }
    init_tracing(config.log_json)?;

    match cli.command {
        Command::Compute { record, json } => {
            let result = compute_emissions(&read_record(&record)?);
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                for line in summary_lines(&result, config.decimals) {
                    println!("{line}");
                }
            }
        }
        Command::Save { record } => {
            let mut store = JsonFileAuditStore::open(&config.store_path)?;
            let doc = store.create(read_record(&record)?)?;
            info!(id = %doc.id, total_tonnes = doc.result.total_tonnes, "audit saved");
            println!("{}", doc.id);
        }
        Command::Update { id, record } => {
            let mut store = JsonFileAuditStore::open(&config.store_path)?;
            let doc = store.update(id, read_record(&record)?)?;
            info!(id = %doc.id, total_tonnes = doc.result.total_tonnes, "audit updated");
        }
        Command::Delete { id } => {
            let mut store = JsonFileAuditStore::open(&config.store_path)?;
            store.delete(id)?;
            info!(%id, "audit deleted");
        }
        Command::Show { id } => {
            let store = JsonFileAuditStore::open(&config.store_path)?;
            println!("{}", serde_json::to_string_pretty(&store.get(id)?)?);
        }
        Command::List => {
            let store = JsonFileAuditStore::open(&config.store_path)?;
            for doc in store.list()? {
                println!("{}", list_line(&doc, config.decimals));
            }
        }
        Command::Export { output } => {
            let store = JsonFileAuditStore::open(&config.store_path)?;
            let csv = to_csv(&store.list()?);
            match output {
                Some(path) => {
                    fs::write(&path, csv)?;
                    info!(path = %path.display(), "export written");
                }
                None => print!("{csv}"),
            }
        }
        Command::Factors => {
            print_table::<FuelType>("Fuel types");
            print_table::<GridRegion>("Grid regions");
        }
    }

    Ok(())
}

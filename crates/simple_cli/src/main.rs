//! Command-line front end for the SimpleModel service.
//!
//! # Responsibility
//! - Wire config, logging, SQLite store and outbox producer into one service.
//! - Expose add/update/remove/get/list plus an outbox dump as subcommands.
//!
//! Output is JSON on stdout; failures print `error[<code>]: <message>` on
//! stderr and exit non-zero.

use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;
use simple_core::db::{open_db, open_db_in_memory};
use simple_core::{
    core_version, init_logging, list_outbox, parse_simple_model_id, EventLog, ServiceConfig,
    ServiceError, SimpleModel, SimpleProducer, SimpleService, SqliteOutboxTransport,
    SqliteSimpleRepository,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "simple", version, about = "Manage SimpleModel records and their change feed")]
struct Cli {
    /// TOML config file; SIMPLE_* environment variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a record; the store assigns its id.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Replace an existing record.
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a record and publish a tombstone.
    Remove { id: String },
    /// Show one record.
    Get { id: String },
    /// Show every record.
    List,
    /// Show messages written to the outbox for the configured topic.
    Outbox,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err
                .downcast_ref::<ServiceError>()
                .map_or("internal", ServiceError::code);
            eprintln!("error[{code}]: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = ServiceConfig::load(cli.config.as_deref())?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, &log_dir.to_string_lossy())?;
    }
    info!(
        "event=cli_start module=cli status=ok version={}",
        core_version()
    );

    let conn = if config.is_in_memory() {
        open_db_in_memory()?
    } else {
        open_db(&config.db_path)?
    };
    let repo = SqliteSimpleRepository::try_new(&conn)?;
    let producer =
        SimpleProducer::with_topic(SqliteOutboxTransport::new(&conn), config.topic.as_str());
    let service = SimpleService::new(repo, producer, EventLog::global("service"));

    match cli.command {
        Command::Add { name, description } => {
            let model = SimpleModel {
                id: None,
                name,
                description,
            };
            print_json(&service.add(&model)?)
        }
        Command::Update {
            id,
            name,
            description,
        } => {
            let id = parse_simple_model_id(&id).ok_or(ServiceError::InvalidIdentifier(id))?;
            let model = SimpleModel {
                id: Some(id),
                name,
                description,
            };
            print_json(&service.update(&model)?)
        }
        Command::Remove { id } => {
            service.remove(&id)?;
            print_json(&serde_json::json!({ "removed": id.trim() }))
        }
        Command::Get { id } => print_json(&service.get(&id)?),
        Command::List => print_json(&service.get_all()?),
        Command::Outbox => print_json(&list_outbox(&conn, &config.topic)?),
    }
}

fn print_json(value: &impl Serialize) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

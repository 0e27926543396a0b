//! `kennel` - CLI for the dog record store

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use kennel::cli::{Cli, Command, ConfigCommand};
use kennel::store::{self, SlotState};
use kennel::{codec, init_logging, Config, KeyValueStore, RecordStore, SqliteStore};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    // Loaded per command so `config validate` still works when the default
    // file is broken.
    let config_path = cli.config;

    match cli.command {
        Command::Add(add) => {
            let mut store = open_store(&load_config(config_path)?)?;
            store.add(add.name, add.breed);
            if let Some(dog) = store.records().last() {
                println!("Added {dog} at position {}", store.len() - 1);
            }
        }
        Command::List(list) => {
            let store = open_store(&load_config(config_path)?)?;
            if list.json {
                println!("{}", codec::encode_pretty(store.records())?);
            } else if store.is_empty() {
                println!("No dogs yet.");
            } else {
                for (position, dog) in store.records().iter().enumerate() {
                    println!("{position:>3}  {dog}");
                }
            }
        }
        Command::Delete(delete) => {
            let mut store = open_store(&load_config(config_path)?)?;
            let requested = delete.positions.len();
            let removed = store.delete_at(delete.positions);
            println!("Removed {removed} of {requested} requested; {} left.", store.len());
        }
        Command::Clear(clear) => {
            if clear.yes {
                let mut store = open_store(&load_config(config_path)?)?;
                store.delete_all();
                println!("Removed all dogs.");
            } else {
                println!("This will remove every dog and the stored list.");
                println!("Use --yes to confirm.");
            }
        }
        Command::Export(export) => handle_export(&load_config(config_path)?, export.pretty)?,
        Command::Status(status) => handle_status(&load_config(config_path)?, status.json)?,
        Command::Config(config_cmd) => handle_config(config_path, config_cmd)?,
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    Config::load_from(path).context("loading configuration")
}

fn open_backend(config: &Config) -> Result<SqliteStore> {
    let path = config.database_path();
    SqliteStore::open(&path).with_context(|| format!("opening {}", path.display()))
}

fn open_store(config: &Config) -> Result<RecordStore<SqliteStore>> {
    Ok(RecordStore::with_key(open_backend(config)?, config.slot_key()))
}

fn handle_export(config: &Config, pretty: bool) -> Result<()> {
    let backend = open_backend(config)?;
    match store::slot_state(&backend, config.slot_key())? {
        SlotState::Present { records } if pretty => {
            println!("{}", codec::encode_pretty(&records)?);
        }
        SlotState::Absent => {
            eprintln!("Slot '{}' is empty.", config.slot_key());
        }
        SlotState::Present { .. } | SlotState::Corrupt { .. } => {
            if let Some(bytes) = backend.get(config.slot_key())? {
                println!("{}", String::from_utf8_lossy(&bytes));
            }
        }
    }
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> Result<()> {
    let backend = open_backend(config)?;
    let state = store::slot_state(&backend, config.slot_key())?;
    let stats = backend.stats()?;
    let updated_at = backend.updated_at(config.slot_key())?;

    let records = match &state {
        SlotState::Present { records } => records.len(),
        SlotState::Absent | SlotState::Corrupt { .. } => 0,
    };
    let problem = match &state {
        SlotState::Corrupt { error } => Some(error.to_string()),
        SlotState::Absent | SlotState::Present { .. } => None,
    };

    if json {
        let status = serde_json::json!({
            "database_path": config.database_path(),
            "slot_key": config.slot_key(),
            "slot_state": state.label(),
            "records": records,
            "slot_updated_at": updated_at.map(|t| t.to_rfc3339()),
            "problem": problem,
            "slot_count": stats.slot_count,
            "db_size_bytes": stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("kennel status");
        println!("-------------");
        println!("Database:      {}", config.database_path().display());
        println!("Slot:          {}", config.slot_key());
        println!("State:         {}", state.label());
        println!("Records:       {records}");
        if let Some(updated_at) = updated_at {
            println!("Last saved:    {}", updated_at.to_rfc3339());
        }
        if let Some(problem) = problem {
            println!("Problem:       {problem} (will load as empty)");
        }
        println!("Slots in use:  {}", stats.slot_count);
        println!("Size:          {} bytes", stats.db_size_bytes);
    }
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = load_config(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Slot key:           {}", config.slot_key());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = Config::resolve_path(file.or(config_path));
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

//! `guestlog` - terminal front end for the front-desk guest log
//!
//! Each invocation reads the wall clock once and hands it to the ledger.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::Write;

use anyhow::Context;
use chrono::{DateTime, Local, Utc};
use clap::Parser;

use guestlog::cli::{
    render, Cli, ClearCommand, Command, ConfigCommand, ExportCommand, ListCommand, OutputFormat,
    SignInCommand, SignOutCommand,
};
use guestlog::{export_csv, init_logging, Config, RecordStore, SqliteStore, VisitLedger, VisitRecord};

type Ledger = VisitLedger<SqliteStore>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone())?;
    let now = Utc::now();

    match cli.command {
        Command::SignIn(cmd) => handle_sign_in(&open_ledger(&config)?, &cmd, now),
        Command::SignOut(cmd) => handle_sign_out(&open_ledger(&config)?, &cmd, now),
        Command::List(cmd) => handle_list(&open_ledger(&config)?, &cmd, now),
        Command::Export(cmd) => handle_export(&open_ledger(&config)?, &cmd, now),
        Command::Clear(cmd) => handle_clear(&open_ledger(&config)?, &cmd),
        Command::Status(cmd) => handle_status(&open_ledger(&config)?, cmd.json, now),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_ledger(config: &Config) -> anyhow::Result<Ledger> {
    let path = config.database_path();
    let backend = SqliteStore::open(&path)
        .with_context(|| format!("cannot open guest log at {}", path.display()))?;
    Ok(VisitLedger::new(
        RecordStore::new(backend, config.storage.records_key.clone()),
        config.auto_close_policy(),
    ))
}

fn print_json(record: &VisitRecord) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}

fn handle_sign_in(ledger: &Ledger, cmd: &SignInCommand, now: DateTime<Utc>) -> anyhow::Result<()> {
    let record = ledger.sign_in(&cmd.to_request(), now)?;
    if cmd.json {
        print_json(&record)?;
    } else {
        println!(
            "Welcome, {}. You signed in at {}.",
            record.first_name,
            record.sign_in_at.with_timezone(&Local).format("%H:%M")
        );
    }
    Ok(())
}

fn handle_sign_out(
    ledger: &Ledger,
    cmd: &SignOutCommand,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    let record = ledger.sign_out(&cmd.full_name(), now)?;
    if cmd.json {
        print_json(&record)?;
    } else {
        println!("Goodbye, {}. You are signed out.", record.first_name);
    }
    Ok(())
}

fn handle_list(ledger: &Ledger, cmd: &ListCommand, now: DateTime<Utc>) -> anyhow::Result<()> {
    let records = if cmd.open {
        let mut records = ledger.open_records(now)?;
        if let Some(needle) = cmd.filter.as_deref().map(|f| f.trim().to_lowercase()) {
            records.retain(|r| r.matches_filter(&needle));
        }
        records
    } else {
        ledger.list_records(cmd.filter.as_deref(), now)?
    };

    match cmd.format {
        OutputFormat::Table => print!("{}", render::render_table(&records, &Local)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Csv => print!("{}", export_csv(&records)?),
    }
    Ok(())
}

fn handle_export(ledger: &Ledger, cmd: &ExportCommand, now: DateTime<Utc>) -> anyhow::Result<()> {
    let csv_text = ledger.export_all(now)?;
    match &cmd.output {
        Some(path) => {
            std::fs::write(path, csv_text)
                .with_context(|| format!("cannot write export to {}", path.display()))?;
            tracing::info!("Exported guest log to {}", path.display());
        }
        None => std::io::stdout().write_all(csv_text.as_bytes())?,
    }
    Ok(())
}

fn handle_clear(ledger: &Ledger, cmd: &ClearCommand) -> anyhow::Result<()> {
    if !cmd.yes {
        println!("This permanently deletes every visit in the guest log.");
        println!("Use --yes to confirm.");
        return Ok(());
    }
    ledger.clear_all()?;
    println!("Guest log cleared.");
    Ok(())
}

fn handle_status(ledger: &Ledger, json: bool, now: DateTime<Utc>) -> anyhow::Result<()> {
    let summary = ledger.summary(now)?;
    let backend = ledger.store().backend();

    if json {
        let status = serde_json::json!({
            "total": summary.total,
            "open": summary.open,
            "auto_closed": summary.auto_closed,
            "database_path": backend.path(),
            "database_bytes": backend.file_size(),
            "records_key": ledger.store().key(),
            "auto_close_hours": ledger.policy().max_open().num_hours(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        let location = format!("{} [{}]", backend.path().display(), ledger.store().key());
        print!("{}", render::render_summary(&summary, &location));
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Records key:        {}", config.storage.records_key);
                println!();
                println!("[Ledger]");
                println!("  Auto-close (hours): {}", config.ledger.auto_close_hours);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

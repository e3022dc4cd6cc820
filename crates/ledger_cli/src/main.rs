//! Command-line caller for the ledger core.
//!
//! # Responsibility
//! - Load configuration, start logging and open the store once.
//! - Route `add` / `list` / `ping` commands to `TransactionService`.
//! - Print results as JSON on stdout and failures on stderr.

use chrono::{DateTime, Utc};
use ledger_core::db::open_store;
use ledger_core::{
    init_from_config, AccountTransactionDto, LedgerConfig, SqliteAccountTransactionRepository,
    TransactionFilter, TransactionService, TransactionType,
};
use log::{info, warn};
use rust_decimal::Decimal;
use std::process::exit;
use std::str::FromStr;

const USAGE: &str = "usage:
  ledger_cli ping
  ledger_cli add <account> <DEPOSIT|WITHDRAW> <amount> [<rfc3339-timestamp>]
  ledger_cli list <account> [--type <DEPOSIT|WITHDRAW>] [--from <ts>] [--to <ts>]";

#[derive(Debug, PartialEq)]
enum Command {
    Ping,
    Store(StoreCommand),
}

/// Commands that need an open store.
#[derive(Debug, PartialEq)]
enum StoreCommand {
    Add(AccountTransactionDto),
    List {
        account_number: String,
        filter: TransactionFilter,
    },
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(message) = run(&args) {
        eprintln!("{message}");
        exit(1);
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let command = match parse_command(args)? {
        Command::Ping => {
            println!("ledger_core ping={}", ledger_core::ping());
            println!("ledger_core version={}", ledger_core::core_version());
            return Ok(());
        }
        Command::Store(command) => command,
    };

    let config = LedgerConfig::from_env()?;
    init_from_config(&config)?;
    if let Some(warning) = in_memory_store_warning(&config, &command) {
        warn!("event=cli_store module=cli status=in_memory");
        eprintln!("{warning}");
    }

    let conn = open_store(config.db_path.as_deref())
        .map_err(|err| format!("failed to open ledger store: {err}"))?;
    let service = TransactionService::new(SqliteAccountTransactionRepository::new(&conn));

    let output = match command {
        StoreCommand::Add(dto) => {
            let saved = service.add_transaction(dto).map_err(|err| err.to_string())?;
            serde_json::to_string_pretty(&saved)
        }
        StoreCommand::List {
            account_number,
            filter,
        } => {
            let found = service
                .find_all_with_optional_filters(&account_number, &filter)
                .map_err(|err| err.to_string())?;
            info!("event=cli_list module=cli status=ok count={}", found.len());
            serde_json::to_string_pretty(&found)
        }
    }
    .map_err(|err| format!("failed to encode output: {err}"))?;

    println!("{output}");
    Ok(())
}

/// `LEDGER_DB_PATH` unset means an in-memory store that is gone when the
/// process exits, so a one-shot `add` or `list` never sees earlier runs.
fn in_memory_store_warning(config: &LedgerConfig, command: &StoreCommand) -> Option<String> {
    if config.db_path.is_some() {
        return None;
    }
    let effect = match command {
        StoreCommand::Add(_) => "the record will be discarded when this command exits",
        StoreCommand::List { .. } => "no records from earlier runs are visible",
    };
    Some(format!(
        "warning: {} is not set, using an in-memory store; {effect}",
        ledger_core::config::DB_PATH_VAR
    ))
}

fn parse_command(args: &[String]) -> Result<Command, String> {
    let (name, rest) = args.split_first().ok_or_else(|| USAGE.to_string())?;
    match name.as_str() {
        "ping" => Ok(Command::Ping),
        "add" => parse_add(rest),
        "list" => parse_list(rest),
        other => Err(format!("unknown command `{other}`\n{USAGE}")),
    }
}

fn parse_add(args: &[String]) -> Result<Command, String> {
    let [account, kind, amount, rest @ ..] = args else {
        return Err(USAGE.to_string());
    };
    let transaction_ts = match rest {
        [] => Some(Utc::now()),
        [ts] => Some(parse_timestamp(ts)?),
        _ => return Err(USAGE.to_string()),
    };
    let kind = TransactionType::from_str(kind).map_err(|err| err.to_string())?;
    let amount =
        Decimal::from_str(amount).map_err(|err| format!("invalid amount `{amount}`: {err}"))?;

    Ok(Command::Store(StoreCommand::Add(AccountTransactionDto::new(
        account.as_str(),
        transaction_ts,
        kind,
        amount,
    ))))
}

fn parse_list(args: &[String]) -> Result<Command, String> {
    let (account_number, mut rest) = args.split_first().ok_or_else(|| USAGE.to_string())?;
    let mut filter = TransactionFilter::default();

    while let [flag, value, tail @ ..] = rest {
        match flag.as_str() {
            "--type" => {
                let kind = TransactionType::from_str(value).map_err(|err| err.to_string())?;
                filter.kind = Some(kind);
            }
            "--from" => filter.start = Some(parse_timestamp(value)?),
            "--to" => filter.end = Some(parse_timestamp(value)?),
            other => return Err(format!("unknown flag `{other}`\n{USAGE}")),
        }
        rest = tail;
    }
    if !rest.is_empty() {
        return Err(format!("missing value for `{}`\n{USAGE}", rest[0]));
    }

    Ok(Command::Store(StoreCommand::List {
        account_number: account_number.clone(),
        filter,
    }))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|err| format!("invalid timestamp `{value}`: {err}"))
}

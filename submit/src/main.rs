use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::config::{read_config, read_config_from_toml};
use client::eth_ledger::EthTicketLedger;
use ledger_api::TicketLedger;
use ledger_api::types::{format_address, parse_address};
use submit::normalize::parse_event_id;
use submit::{
    EventFields, OperationOutcome, PurchaseFields, RemoteSession, TransferFields,
    submit_create_event, submit_purchase, submit_transfer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ticketing")]
#[command(about = "Create events, buy and transfer tickets on an EventContract ledger")]
struct Cli {
    /// Path to config.toml; defaults to ./config/config.toml
    #[arg(long, global = true)]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an event and report its id
    CreateEvent {
        #[arg(long)]
        name: String,
        /// Local date-time, e.g. 2030-06-01T20:00
        #[arg(long)]
        date: String,
        /// Price per ticket in the ledger's smallest unit
        #[arg(long)]
        price: String,
        #[arg(long)]
        ticket_count: String,
    },
    /// Buy tickets, paying price x quantity
    BuyTicket {
        #[arg(long)]
        event_id: String,
        #[arg(long)]
        quantity: String,
    },
    /// Transfer owned tickets to another account
    TransferTicket {
        #[arg(long)]
        event_id: String,
        #[arg(long)]
        quantity: String,
        #[arg(long)]
        to: String,
    },
    /// Show the ledger's next event id
    NextId,
    /// Show an account's ticket balance for an event
    Balance {
        #[arg(long)]
        event_id: String,
        /// Defaults to the acting account
        #[arg(long)]
        account: Option<String>,
    },
    /// Show an event record
    Event {
        #[arg(long)]
        event_id: String,
    },
    /// List the accounts the provider exposes
    Accounts,
}

fn report(outcome: OperationOutcome) -> Result<ExitCode> {
    info!("{}", outcome);
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = match &cli.config_file {
        Some(path) => read_config(path)?,
        None => read_config_from_toml()?,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let eth = EthTicketLedger::from_config(&config.ledger)?;
    let contract = format_address(&eth.contract());
    let ledger: Arc<dyn TicketLedger> = Arc::new(eth);
    let mut session = RemoteSession::connect(ledger.clone())
        .await
        .with_context(|| {
            format!(
                "failed to connect to {} for contract {}",
                config.ledger.url, contract
            )
        })?;
    info!("Using EventContract at {}", contract);
    if let Some(account) = &config.ledger.account {
        let account = parse_address(account)
            .with_context(|| format!("invalid account '{}' in config", account))?;
        session = session.with_acting_account(account)?;
    }

    match cli.command {
        Commands::CreateEvent {
            name,
            date,
            price,
            ticket_count,
        } => {
            let fields = EventFields {
                name,
                start_time: date,
                price,
                ticket_supply: ticket_count,
            };
            report(submit_create_event(&session, &fields).await)
        }
        Commands::BuyTicket { event_id, quantity } => {
            let fields = PurchaseFields { event_id, quantity };
            report(submit_purchase(&session, &fields).await)
        }
        Commands::TransferTicket {
            event_id,
            quantity,
            to,
        } => {
            let fields = TransferFields {
                event_id,
                quantity,
                recipient: to,
            };
            report(submit_transfer(&session, &fields).await)
        }
        Commands::NextId => {
            let next_id = ledger.next_id().await?;
            info!("Next event id: {}", next_id);
            println!("{}", next_id);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Balance { event_id, account } => {
            let event_id = parse_event_id(&event_id)?;
            let account = match account {
                Some(raw) => parse_address(&raw)?,
                None => session
                    .acting_account()
                    .context("the provider exposes no account")?,
            };
            let balance = ledger.tickets(account, event_id).await?;
            info!(
                "{} holds {} ticket(s) for event {}",
                format_address(&account),
                balance,
                event_id
            );
            println!("{}", balance);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Event { event_id } => {
            let event_id = parse_event_id(&event_id)?;
            let record = ledger.event(event_id).await?;
            info!("Event {}: {}", event_id, record);
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Accounts => {
            for account in session.accounts() {
                println!("{}", format_address(account));
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

use anyhow::Context;
use bet_ledger::{
    app::{
        App,
        blob_storage::BlobStorage,
        gateway::StorageGateway,
        sled_storage::SledBlobStorage,
    },
    config::LedgerConfig,
    entry::{
        BetType,
        SystemClock,
    },
    submission::BetForm,
    summary::DEFAULT_LEADER_LIMIT,
};
use clap::{
    Parser,
    Subcommand,
};
use serde::Serialize;
use std::{
    fs,
    path::PathBuf,
};
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(version, about = "Record and summarize two-digit bets", long_about = None)]
struct Args {
    /// Directory holding the sled database
    #[arg(long, default_value = "bet_ledger_data")]
    data_dir: PathBuf,

    /// JSON file overriding storage keys and the legacy owner name
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short, long, default_value = "false")]
    tracing: bool,

    /// Print machine-readable JSON instead of text
    #[arg(long, default_value = "false")]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record bets for one customer
    Add {
        #[arg(short, long)]
        customer: String,

        /// Top bet as NN:AMOUNT, number 00-49
        #[arg(long = "top", value_parser = parse_bet)]
        top: Vec<(String, String)>,

        /// Bottom bet as NN:AMOUNT, number 50-99
        #[arg(long = "bottom", value_parser = parse_bet)]
        bottom: Vec<(String, String)>,
    },
    /// Overall totals
    Summary,
    /// Per-number totals with their entries
    Numbers,
    /// Numbers with the largest top and bottom totals
    Leaders {
        #[arg(short, long, default_value_t = DEFAULT_LEADER_LIMIT)]
        limit: usize,
    },
    /// Per-customer totals
    Customers,
    /// Store a raw blob under any key, e.g. an exported legacy sheet
    PutRaw {
        #[arg(short, long)]
        key: String,

        #[arg(short, long)]
        file: PathBuf,
    },
}

fn parse_bet(raw: &str) -> Result<(String, String), String> {
    let (number, amount) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected NN:AMOUNT, got '{raw}'"))?;
    Ok((number.trim().to_string(), amount.trim().to_string()))
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{json}");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.tracing {
        init_tracing();
    }
    let config = match &args.config {
        Some(path) => LedgerConfig::from_file(path)?,
        None => LedgerConfig::default(),
    };
    fs::create_dir_all(&args.data_dir).with_context(|| {
        format!("create data directory {}", args.data_dir.display())
    })?;
    tracing::info!("Using sled storage directory {}", args.data_dir.display());

    let mut storage = SledBlobStorage::open(&args.data_dir)?;
    if let Command::PutRaw { key, file } = &args.command {
        let raw = fs::read_to_string(file)
            .with_context(|| format!("read {}", file.display()))?;
        if !config.storage_keys.contains(key) {
            tracing::warn!("{key} is not a recognized storage key; it will never be read");
        }
        storage.set(key, &raw)?;
        println!("stored {} bytes under {key}", raw.len());
        return Ok(());
    }

    let gateway = StorageGateway::from_config(storage, &config);
    let mut app = App::new(gateway, SystemClock);
    app.reload();
    if let Some(source) = app.source() {
        tracing::info!(
            "Loaded {} entries from {} ({} schema)",
            app.entries().len(),
            source.key,
            source.schema
        );
    }

    match args.command {
        Command::Add {
            customer,
            top,
            bottom,
        } => {
            let mut form = BetForm::with_customer_name(&customer);
            for (number, amount) in &top {
                form = form.top(number, amount);
            }
            for (number, amount) in &bottom {
                form = form.bottom(number, amount);
            }
            let receipt = app.submit(&form)?;
            if args.json {
                print_json(&receipt.entries)?;
            } else {
                println!("{}", render::receipt(&receipt));
            }
        }
        Command::Summary => {
            let summary = app.summary();
            if args.json {
                print_json(&summary)?;
            } else {
                println!("{}", render::bet_summary(&summary));
            }
        }
        Command::Numbers => {
            let summaries = app.number_summaries();
            if args.json {
                print_json(&summaries)?;
            } else {
                println!("{}", render::number_summaries(&summaries));
            }
        }
        Command::Leaders { limit } => {
            let top = app.leaders(BetType::Top, limit);
            let bottom = app.leaders(BetType::Bottom, limit);
            if args.json {
                print_json(&render::LeadersDto { top, bottom })?;
            } else {
                println!("{}", render::leaders(BetType::Top, &top));
                println!("{}", render::leaders(BetType::Bottom, &bottom));
            }
        }
        Command::Customers => {
            let customers = app.customers();
            if args.json {
                print_json(&customers)?;
            } else {
                println!("{}", render::customers(&customers));
            }
        }
        // stored before the ledger was loaded
        Command::PutRaw { .. } => {}
    }
    Ok(())
}

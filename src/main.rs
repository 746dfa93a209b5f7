use clap::{Args, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use printquote::application::service::{Quote, QuoteService};
use printquote::domain::account::UserId;
use printquote::domain::ports::{ConfigStore, CreditLedgerBox};
use printquote::domain::rates::RateConfig;
use printquote::domain::subscription::{BillingInterval, PlanTier, default_plans};
use printquote::infrastructure::in_memory::InMemoryCreditLedger;
use printquote::infrastructure::json_file::JsonFileConfigStore;
#[cfg(feature = "storage-rocksdb")]
use printquote::infrastructure::rocksdb::RocksDBStore;
use printquote::interfaces::csv::quote_writer::QuoteWriter;
use printquote::interfaces::json::quote_writer::JsonQuoteWriter;
use printquote::interfaces::json::request_reader::RequestReader;
use std::fs::File;
use std::io::{self, IsTerminal, StdoutLock};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Price a JSON Lines file of calculation requests
    Quote(QuoteArgs),
    /// Inspect or replace the rate configuration
    Rates {
        #[command(subcommand)]
        action: RatesAction,
    },
    /// List the subscription plans
    Plans,
}

#[derive(Args)]
struct QuoteArgs {
    /// Input requests, one JSON object per line
    input: PathBuf,

    /// Rate configuration JSON file
    #[arg(long, env = "PRINTQUOTE_RATES")]
    rates: PathBuf,

    /// User the quotes are charged to
    #[arg(long)]
    user: UserId,

    /// Start a fresh period on this plan before quoting
    #[arg(long, value_enum)]
    plan: Option<PlanArg>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "PRINTQUOTE_DB_PATH")]
    db_path: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum RatesAction {
    /// Print the current rate configuration
    Show {
        #[arg(long, env = "PRINTQUOTE_RATES")]
        rates: PathBuf,
    },
    /// Validate a new document and replace the rate configuration with it
    Set {
        #[arg(long, env = "PRINTQUOTE_RATES")]
        rates: PathBuf,
        /// Replacement rate document
        source: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PlanArg {
    BasicMonthly,
    BasicYearly,
    PremiumMonthly,
    PremiumYearly,
}

impl From<PlanArg> for (PlanTier, BillingInterval) {
    fn from(plan: PlanArg) -> Self {
        match plan {
            PlanArg::BasicMonthly => (PlanTier::Basic, BillingInterval::Monthly),
            PlanArg::BasicYearly => (PlanTier::Basic, BillingInterval::Yearly),
            PlanArg::PremiumMonthly => (PlanTier::Premium, BillingInterval::Monthly),
            PlanArg::PremiumYearly => (PlanTier::Premium, BillingInterval::Yearly),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

enum QuoteSink<'a> {
    Csv(QuoteWriter<StdoutLock<'a>>),
    Json(JsonQuoteWriter<StdoutLock<'a>>),
}

impl QuoteSink<'_> {
    fn write(
        &mut self,
        request: usize,
        user: UserId,
        quote: &Quote,
    ) -> printquote::error::Result<()> {
        match self {
            QuoteSink::Csv(writer) => writer.write_quote(request, user, quote),
            QuoteSink::Json(writer) => writer.write_quote(request, user, quote),
        }
    }

    fn flush(&mut self) -> printquote::error::Result<()> {
        match self {
            QuoteSink::Csv(writer) => writer.flush(),
            QuoteSink::Json(writer) => writer.flush(),
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "printquote=info".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal())
                .with_target(false),
        )
        .init();
}

#[cfg(feature = "storage-rocksdb")]
fn open_ledger(db_path: Option<PathBuf>) -> Result<CreditLedgerBox> {
    match db_path {
        Some(db_path) => Ok(Box::new(RocksDBStore::open(db_path).into_diagnostic()?)),
        None => Ok(Box::new(InMemoryCreditLedger::new())),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_ledger(db_path: Option<PathBuf>) -> Result<CreditLedgerBox> {
    if db_path.is_some() {
        tracing::warn!(
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage."
        );
    }
    Ok(Box::new(InMemoryCreditLedger::new()))
}

async fn run_quotes(args: QuoteArgs) -> Result<()> {
    let config_store = JsonFileConfigStore::new(&args.rates);
    // Fail fast on an unreadable or invalid rates file
    config_store.get_config().await.into_diagnostic()?;

    let service = QuoteService::new(Box::new(config_store), open_ledger(args.db_path)?);
    let user = args.user;

    if let Some(plan) = args.plan {
        let (tier, interval) = plan.into();
        service
            .subscribe(user, tier, interval)
            .await
            .into_diagnostic()?;
    }

    let file = File::open(&args.input).into_diagnostic()?;
    let reader = RequestReader::new(file);

    let stdout = io::stdout();
    let mut sink = match args.format {
        OutputFormat::Csv => QuoteSink::Csv(QuoteWriter::new(stdout.lock()).into_diagnostic()?),
        OutputFormat::Json => QuoteSink::Json(JsonQuoteWriter::new(stdout.lock())),
    };

    let (mut issued, mut failed) = (0usize, 0usize);
    for (index, request) in reader.requests().enumerate() {
        let number = index + 1;
        match request {
            Ok(request) => match service.quote(user, &request).await {
                Ok(quote) => {
                    sink.write(number, user, &quote).into_diagnostic()?;
                    issued += 1;
                }
                Err(e) => {
                    error!(request = number, "Error processing request: {}", e);
                    failed += 1;
                }
            },
            Err(e) => {
                error!(request = number, "Error reading request: {}", e);
                failed += 1;
            }
        }
    }
    sink.flush().into_diagnostic()?;

    info!(%user, issued, failed, "batch finished");
    Ok(())
}

async fn show_rates(rates: PathBuf) -> Result<()> {
    let config = JsonFileConfigStore::new(rates)
        .get_config()
        .await
        .into_diagnostic()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&*config).into_diagnostic()?
    );
    Ok(())
}

async fn set_rates(rates: PathBuf, source: PathBuf) -> Result<()> {
    let file = File::open(&source).into_diagnostic()?;
    let config = RateConfig::from_reader(file).into_diagnostic()?;

    let store = JsonFileConfigStore::new(rates);
    store.put_config(config).await.into_diagnostic()?;
    info!(path = %store.path().display(), "rate configuration replaced");
    Ok(())
}

fn list_plans() -> Result<()> {
    for plan in default_plans() {
        println!("{}", serde_json::to_string(&plan).into_diagnostic()?);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Quote(args) => run_quotes(args).await,
        Command::Rates { action } => match action {
            RatesAction::Show { rates } => show_rates(rates).await,
            RatesAction::Set { rates, source } => set_rates(rates, source).await,
        },
        Command::Plans => list_plans(),
    }
}

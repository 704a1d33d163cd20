use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

use deal_health::config::{self, Config};
use deal_health::output::{self, ScoredTransaction};
use deal_health::scoring::{self, HealthResult, RiskRank, ScoringConfig, TIERS};
use deal_health::server::{self, AppState};
use deal_health::snapshot::{self, TransactionSnapshot};
use deal_health::store::{DirStore, TransactionStore};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_STORE: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ListFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a single snapshot file
    Score {
        /// Path to a snapshot JSON file
        snapshot: PathBuf,

        /// Evaluate as of this instant (RFC 3339, defaults to now)
        #[arg(long)]
        now: Option<DateTime<Utc>>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rank every stored transaction, lowest score first
    List {
        #[arg(long, value_enum, default_value_t = ListFormat::Table)]
        format: ListFormat,

        /// Evaluate as of this instant (RFC 3339, defaults to now)
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
    /// Print the score tiers used for status and badge colors
    Tiers,
    /// Serve health results over HTTP
    Serve {
        /// Address to bind (overrides server.bind)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Write a config file with the default policy
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "deal-health")]
#[command(about = "Transaction health score and closing readiness", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/deal-health/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Commands::Init { force } = cli.command {
        std::process::exit(run_init(cli.config, force));
    }

    let config = match config::load_config(cli.config) {
        Ok(c) => c,
        Err(e) => {
            error!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    let effective_scoring = config.scoring.clone().unwrap_or_default();
    if let Err(errors) = scoring::validate_scoring(&effective_scoring) {
        error!("Scoring config errors:");
        for e in errors {
            error!("  - {}", e);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let code = match cli.command {
        Commands::Score {
            snapshot: path,
            now,
            json,
        } => run_score(&path, now.unwrap_or_else(Utc::now), json, &effective_scoring),
        Commands::List { format, now } => {
            run_list(&config, now.unwrap_or_else(Utc::now), format, &effective_scoring)
        }
        Commands::Tiers => {
            println!("{}", output::format_tiers(&TIERS, output::should_use_colors()));
            EXIT_SUCCESS
        }
        Commands::Serve { bind } => run_serve(&config, bind, effective_scoring).await,
        Commands::Init { .. } => unreachable!("handled before config load"),
    };

    std::process::exit(code);
}

fn run_init(config_path: Option<PathBuf>, force: bool) -> i32 {
    let path = match config_path.map_or_else(config::get_config_path, Ok) {
        Ok(p) => p,
        Err(e) => {
            error!("Config error: {:#}", e);
            return EXIT_CONFIG;
        }
    };
    let store_path = match config::get_config_dir() {
        Ok(dir) => dir.join("data"),
        Err(e) => {
            error!("Config error: {:#}", e);
            return EXIT_CONFIG;
        }
    };

    match config::write_default_config(&path, &store_path, force) {
        Ok(()) => {
            println!("Wrote {}", path.display());
            EXIT_SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            EXIT_CONFIG
        }
    }
}

fn run_score(path: &Path, now: DateTime<Utc>, json: bool, policy: &ScoringConfig) -> i32 {
    let snapshot = match snapshot::load_snapshot(path) {
        Ok(s) => s,
        Err(e) => {
            error!("{:#}", e);
            return EXIT_INPUT;
        }
    };
    if let Err(errors) = snapshot::validate_snapshot(&snapshot) {
        error!("Invalid snapshot {}:", path.display());
        for e in errors {
            error!("  - {}", e);
        }
        return EXIT_INPUT;
    }

    let result = scoring::compute_health(&snapshot, now, policy);
    debug!(
        transaction_id = %snapshot.transaction.id,
        penalty = result.breakdown.total_penalty(),
        "scored snapshot"
    );

    if json {
        match serde_json::to_string_pretty(&result) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                error!("Failed to serialize result: {}", e);
                return EXIT_INPUT;
            }
        }
    } else {
        println!(
            "{}",
            output::format_health_detail(
                &snapshot.transaction.id,
                &result,
                output::should_use_colors()
            )
        );
    }
    EXIT_SUCCESS
}

fn run_list(
    config: &Config,
    now: DateTime<Utc>,
    format: ListFormat,
    policy: &ScoringConfig,
) -> i32 {
    let start_time = Instant::now();
    let store = match config.store_path() {
        Ok(p) => DirStore::new(p),
        Err(e) => {
            error!("Config error: {:#}", e);
            return EXIT_CONFIG;
        }
    };

    let ids = match store.list_ids() {
        Ok(ids) => ids,
        Err(e) => {
            error!("Store error: {:#}", e);
            return EXIT_STORE;
        }
    };
    debug!(count = ids.len(), root = %store.root().display(), "listing transactions");

    let mut scored: Vec<(TransactionSnapshot, HealthResult)> = Vec::with_capacity(ids.len());
    for id in &ids {
        let snapshot = match store.load(id) {
            Ok(Some(s)) => s,
            Ok(None) => continue,
            Err(e) => {
                // Keep going with the rest of the store
                warn!("Skipping {}: {:#}", id, e);
                continue;
            }
        };
        if let Err(errors) = snapshot::validate_snapshot(&snapshot) {
            warn!("Skipping {}: {}", id, errors.join("; "));
            continue;
        }
        let result = scoring::compute_health(&snapshot, now, policy);
        scored.push((snapshot, result));
    }

    scored.sort_by(|a, b| risk_rank(&a.0, &a.1).cmp(&risk_rank(&b.0, &b.1)));

    match format {
        ListFormat::Json => {
            let summaries: Vec<_> = scored
                .iter()
                .map(|(s, r)| {
                    serde_json::json!({
                        "transaction_id": s.transaction.id,
                        "closing_date": s.transaction.closing_date,
                        "health": r,
                    })
                })
                .collect();
            match serde_json::to_string_pretty(&summaries) {
                Ok(s) => println!("{}", s),
                Err(e) => {
                    error!("Failed to serialize results: {}", e);
                    return EXIT_INPUT;
                }
            }
        }
        ListFormat::Table | ListFormat::Tsv => {
            let rows: Vec<ScoredTransaction> = scored
                .iter()
                .map(|(s, r)| ScoredTransaction {
                    id: &s.transaction.id,
                    closing_date: s.transaction.closing_date,
                    result: r,
                })
                .collect();
            if format == ListFormat::Tsv {
                println!("{}", output::format_tsv(&rows));
            } else {
                println!(
                    "{}",
                    output::format_health_table(&rows, output::should_use_colors())
                );
            }
        }
    }

    debug!(
        "Total: {} transactions in {:?}",
        scored.len(),
        start_time.elapsed()
    );
    EXIT_SUCCESS
}

fn risk_rank<'a>(snapshot: &'a TransactionSnapshot, result: &HealthResult) -> RiskRank<'a> {
    RiskRank {
        score: result.score,
        closing_date: snapshot.transaction.closing_date,
        id: &snapshot.transaction.id,
    }
}

async fn run_serve(config: &Config, bind: Option<String>, policy: ScoringConfig) -> i32 {
    let store_path = match config.store_path() {
        Ok(p) => p,
        Err(e) => {
            error!("Config error: {:#}", e);
            return EXIT_CONFIG;
        }
    };
    let store: Arc<dyn TransactionStore> = Arc::new(DirStore::new(store_path));
    let bind = bind.unwrap_or_else(|| config.server.bind.clone());

    match server::serve(AppState::new(store, policy), &bind).await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            EXIT_STORE
        }
    }
}

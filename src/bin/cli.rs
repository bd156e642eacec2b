use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use fixture_collector::api::transport::ReqwestTransport;
use fixture_collector::config::parse_tz;
use fixture_collector::utils::compare::{compare_team_lists, read_team_pairs, save_diff_to_csv};
use fixture_collector::utils::data::{load_checkpoint, save_checkpoint, save_fixtures_to_csv};
use fixture_collector::{
    build_collector, conference_groups, find_conference, CancelFlag, Checkpoint, CollectRequest,
    CollectorConfig, CollectorSetup, Competition, SourceKind, CONFERENCES,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "cli", about = "NCAA basketball fixture collector")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Collect fixtures for a date range and write them as CSV
    Collect(CollectArgs),
    /// List the built-in conferences and their group ids
    Conferences,
    /// Compare the first two columns of two CSV exports row by row
    Compare {
        #[arg(long)]
        old: PathBuf,
        #[arg(long)]
        new: PathBuf,
        #[arg(long, default_value = "cache/teams_difference.csv")]
        out: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CompetitionArg {
    Mens,
    Womens,
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceArg {
    /// Scoreboard JSON, one request per day and conference
    Api,
    /// Schedule page, one request per day
    Page,
}

#[derive(clap::Args)]
struct CollectArgs {
    #[arg(long, value_enum, default_value = "mens")]
    competition: CompetitionArg,
    #[arg(long, value_enum, default_value = "api")]
    source: SourceArg,
    /// First day, YYYY-MM-DD
    #[arg(long)]
    start: NaiveDate,
    /// Last day (inclusive), YYYY-MM-DD
    #[arg(long)]
    end: NaiveDate,
    /// Restrict the api source to these conferences (repeatable)
    #[arg(long = "conference")]
    conferences: Vec<String>,
    /// Look up venues for fixtures without a location
    #[arg(long)]
    resolve_venues: bool,
    #[arg(long, default_value = "cache")]
    out_dir: PathBuf,
    /// Resume from / save progress to this JSON file
    #[arg(long)]
    checkpoint: Option<PathBuf>,
    #[arg(long, env = "FIXTURES_DISPLAY_TZ")]
    display_tz: Option<String>,
    #[arg(long, env = "FIXTURES_SCHEDULE_DELAY_MS")]
    schedule_delay_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Collect(args) => collect(args).await,
        Command::Conferences => {
            for (label, id) in CONFERENCES {
                println!("{:<16} {}", label, id);
            }
            Ok(())
        }
        Command::Compare { old, new, out } => compare(old, new, out),
    }
}

async fn collect(args: CollectArgs) -> Result<()> {
    let mut config = CollectorConfig::from_env()?;
    if let Some(tz) = &args.display_tz {
        config.display_tz = parse_tz(tz)?;
    }
    if let Some(ms) = args.schedule_delay_ms {
        config.schedule_interval = Duration::from_millis(ms);
    }

    let competition = match args.competition {
        CompetitionArg::Mens => Competition::mens_basketball(),
        CompetitionArg::Womens => Competition::womens_basketball(),
    };
    let source = match args.source {
        SourceArg::Api => SourceKind::Api,
        SourceArg::Page => SourceKind::Page,
    };

    let conferences = if args.conferences.is_empty() {
        conference_groups()
    } else {
        args.conferences
            .iter()
            .map(|label| {
                find_conference(label).with_context(|| format!("Unknown conference: {}", label))
            })
            .collect::<Result<Vec<_>>>()?
    };

    let transport = Arc::new(ReqwestTransport::new(&config).context("Failed to build HTTP client")?);
    let setup = CollectorSetup {
        source,
        competition: competition.clone(),
        resolve_venues: args.resolve_venues,
    };
    let cancel = CancelFlag::new();
    let (collector, groups) = build_collector(&setup, &config, transport, conferences);
    let collector = collector.with_cancel(cancel.clone());

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nStopping after the current unit...");
            cancel.cancel();
        }
    });

    let run = Checkpoint::run_label(&competition, source, &config);
    let mut checkpoint = match &args.checkpoint {
        Some(path) => match load_checkpoint(path)? {
            Some(existing) if existing.run == run && !existing.is_empty() => {
                println!("Resuming from {} ({} units done)\n", path.display(), existing.len());
                existing
            }
            Some(existing) if existing.run != run => {
                println!("Checkpoint {} is for another run, starting fresh\n", path.display());
                Checkpoint::new(run.clone())
            }
            _ => Checkpoint::new(run.clone()),
        },
        None => Checkpoint::new(run.clone()),
    };
    let resume_from = checkpoint.clone();

    println!("{} Fixture Extractor\n", competition.name);
    println!("Fetching fixtures {} to {}...\n", args.start, args.end);

    let request = CollectRequest {
        start: args.start,
        end: args.end,
        groups,
    };

    let mut save_error = None;
    let result = collector
        .collect(&request, Some(&resume_from), |progress| {
            tracing::info!(
                "{:>5.1}% {} {} ({} fixtures)",
                progress.fraction() * 100.0,
                progress.unit.day,
                progress.unit.group.label,
                progress.fixtures.len()
            );
            if let Some(path) = &args.checkpoint {
                if !progress.resumed {
                    checkpoint.record(progress.unit, progress.fixtures);
                    if let Err(e) = save_checkpoint(&checkpoint, path) {
                        save_error.get_or_insert(e);
                    }
                }
            }
        })
        .await;

    let collection = result?;
    if let Some(e) = save_error {
        eprintln!("Warning: could not save checkpoint: {:#}", e);
    }

    if collection.is_empty() {
        println!("No fixtures found for this date range.");
        return Ok(());
    }

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;
    let full_path = args.out_dir.join("fixtures.csv");
    let dup_path = args.out_dir.join("duplicates.csv");

    let rows = save_fixtures_to_csv(&collection.fixtures, &full_path)?;
    let duplicates = collection.duplicates();
    let dup_rows = save_fixtures_to_csv(duplicates, &dup_path)?;

    println!("Data loaded: {} rows extracted", rows);
    println!("Duplicates flagged: {}", dup_rows);
    if collection.units_failed > 0 {
        println!("Units with errors: {}", collection.units_failed);
    }
    if collection.cancelled {
        println!(
            "Cancelled after {}/{} units; output is partial",
            collection.units_completed, collection.units_total
        );
    }
    println!("\nSaved fixtures to {}", full_path.display());
    println!("Saved duplicates to {}", dup_path.display());

    Ok(())
}

fn compare(old: PathBuf, new: PathBuf, out: PathBuf) -> Result<()> {
    let old_rows = read_team_pairs(&old)?;
    let new_rows = read_team_pairs(&new)?;
    let diff = compare_team_lists(&old_rows, &new_rows);

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    save_diff_to_csv(&diff, &out)?;

    let changed = diff.iter().filter(|row| row.differs()).count();
    println!("Compared {} rows, {} differ", diff.len(), changed);
    println!("Saved comparison to {}", out.display());
    Ok(())
}

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use mrt_topology::corpus;
use mrt_topology::SnapshotStore;

mod output;

use output::{print_changes, print_snapshot, Format};

#[derive(Parser, Debug)]
#[command(
    name = "snapshot-diff",
    author,
    version,
    about = "Validate the snapshot corpus and narrate network changes between dates",
    long_about = "Loads every snapshot document in the corpus directory, validates each one \
                  and the ordering between them, then reports what the network looked like \
                  on a date or what changed between two dates.\n\n\
                  Run `validate` before committing a new snapshot: a document that fails here \
                  would also stop the history server from starting."
)]
struct Args {
    /// Directory holding one JSON document per snapshot
    #[arg(short, long, default_value = "data/snapshots")]
    corpus: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate every document and the order of effective dates
    Validate,
    /// Narrate every published change in order
    History,
    /// Narrate what changed between the snapshots in effect on two dates
    Diff {
        /// Earlier date (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Later date (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,
    },
    /// Show which snapshot is in effect on a date
    Resolve {
        /// Query date (YYYY-MM-DD); defaults to today in Singapore
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    log::debug!("Corpus: {}", args.corpus.display());

    if !args.corpus.is_dir() {
        bail!("Corpus directory does not exist: {}", args.corpus.display());
    }

    let store = load(&args.corpus)?;

    match args.command {
        Command::Validate => {
            log::info!("All {} snapshots valid", store.len());
            for (index, snapshot) in store.iter().enumerate() {
                let validity = store.validity(index).context("Snapshot index out of range")?;
                log::info!(
                    "  {} {:<45} {} stations, {} segments{}",
                    snapshot.effective_date,
                    snapshot.label,
                    snapshot.stations.len(),
                    snapshot.segments.len(),
                    validity.until.map(|d| format!(", until {d}")).unwrap_or_default()
                );
            }
        }
        Command::History => {
            for index in 1..store.len() {
                let changes = store
                    .changes_at(index)
                    .context("Snapshot index out of range")?
                    .context("Failed to diff adjacent snapshots")?;
                let (previous, current) = match (store.get(index - 1), store.get(index)) {
                    (Some(p), Some(c)) => (p, c),
                    _ => bail!("Snapshot index out of range"),
                };
                print_changes(args.format, previous, current, &changes)?;
            }
        }
        Command::Diff { from, to } => {
            if to < from {
                bail!("--to ({to}) is before --from ({from})");
            }
            let older = store.resolve(from)?;
            let newer = store.resolve(to)?;
            if older.effective_date == newer.effective_date {
                log::info!("{from} and {to} resolve to the same snapshot ({})", older.effective_date);
            }
            let delta = mrt_topology::diff(older, newer)?;
            print_changes(args.format, older, newer, &delta)?;
        }
        Command::Resolve { date } => {
            let date = date.unwrap_or_else(mrt_topology::store::today);
            let index = store.resolve_index(date)?;
            let snapshot = store.resolve(date)?;
            print_snapshot(args.format, snapshot, store.validity(index))?;
        }
    }

    Ok(())
}

fn load(dir: &std::path::Path) -> Result<SnapshotStore> {
    let files = corpus::corpus_files(dir)?;
    log::info!("Loading {} snapshot documents...", files.len());

    let mut snapshots = Vec::with_capacity(files.len());
    for path in &files {
        let snapshot =
            corpus::load_file(path).with_context(|| format!("Invalid snapshot document {}", path.display()))?;
        log::debug!("  {} -> {}", path.display(), snapshot.effective_date);
        snapshots.push(snapshot);
    }

    let store = SnapshotStore::from_snapshots(snapshots).context("Failed to build snapshot store")?;
    if store.is_empty() {
        bail!("No snapshot documents found in {}", dir.display());
    }
    Ok(store)
}

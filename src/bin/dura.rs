//! Dura CLI
//!
//! Command-line interface for creating and inspecting Dura archives.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dura::{Archive, BlockDump, Config, Result, SyncStrategy};
use tracing_subscriber::{fmt, EnvFilter};

/// Dura CLI
#[derive(Parser, Debug)]
#[command(name = "dura")]
#[command(about = "Versioned backup archive")]
#[command(version)]
struct Args {
    /// Skip fsync of written files (faster, not crash safe)
    #[arg(long, global = true)]
    no_sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new archive (the path must not exist)
    Init {
        /// Archive directory to create
        archive: PathBuf,
    },

    /// Show summary information about an archive
    Describe {
        /// Archive directory
        archive: PathBuf,
    },

    /// List band numbers in order
    Versions {
        /// Archive directory
        archive: PathBuf,
    },

    /// Show debug information about stored block files
    Dump {
        /// Block files to dump
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Store a copy of source files in the archive, as a new band
    Backup {
        /// Archive directory
        archive: PathBuf,

        /// Source directory
        source: PathBuf,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,dura=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let sync = if args.no_sync {
        SyncStrategy::Never
    } else {
        SyncStrategy::Always
    };

    if let Err(e) = run(args.command, sync) {
        tracing::error!("{}", e);
        eprintln!("dura: {}", e);
        std::process::exit(1);
    }
}

fn config_for(archive: PathBuf, sync: SyncStrategy) -> Config {
    Config::builder()
        .archive_dir(archive)
        .sync_strategy(sync)
        .build()
}

fn run(command: Commands, sync: SyncStrategy) -> Result<()> {
    match command {
        Commands::Init { archive } => {
            let archive = Archive::create_with_config(config_for(archive, sync))?;
            println!("Created new archive in {}", archive.path().display());
        }
        Commands::Describe { archive } => {
            let archive = Archive::open_with_config(config_for(archive, sync))?;
            println!("Archive {}", archive.path().display());
            println!("Format version {}", dura::archive::ARCHIVE_VERSION);
            let mut count = 0;
            let mut problem_count = 0;
            for number in archive.list_bands()? {
                let reader = archive.open_band_reader(&number)?;
                let info = reader.info()?;
                let state = if info.is_finished { "finished" } else { "open" };
                let start = info
                    .start_time
                    .map_or_else(|| "-".to_string(), |t| t.to_string());
                println!(
                    "  b{}  {:<8}  {:>6} blocks  started {}",
                    info.number, state, info.block_count, start
                );
                for problem in reader.validate()? {
                    println!("    problem: {}", problem);
                    problem_count += 1;
                }
                count += 1;
            }
            println!("{} band(s)", count);
            if problem_count > 0 {
                println!("{} problem(s) found", problem_count);
            }
        }
        Commands::Versions { archive } => {
            let archive = Archive::open_with_config(config_for(archive, sync))?;
            for number in archive.list_bands()? {
                println!("{}", number.dir_name());
            }
        }
        Commands::Dump { files } => {
            for path in files {
                let dump = BlockDump::read(&path)?;
                print!("{}", dump);
            }
        }
        Commands::Backup { archive, source } => {
            let archive = Archive::open_with_config(config_for(archive, sync))?;
            let band = archive.create_band()?;
            // TODO: walk `source` and store its files as blocks once the
            // chunking/dedup layer exists.
            tracing::warn!(
                source = %source.display(),
                "storing source content is not implemented; band left empty"
            );
            band.finish_band()?;
            println!("Created band {}", band.band_number());
        }
    }
    Ok(())
}

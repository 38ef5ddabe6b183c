use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::error;

use missingtube::config::{load_config, load_config_from, Config};
use missingtube::logging::init_logging;
use missingtube::{ComparisonResult, MatchStatus};

#[derive(Parser)]
#[command(name = "missingtube", version, author = "Michael Asiedu")]
struct Cli {
    /// Path to a TOML config file (defaults to ./missingtube.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding the .missingtube store (overrides the config file)
    #[arg(long, global = true, value_name = "DIRECTORY")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty store
    Init,
    /// Load a playlist file and make it the playlist in view
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Show the playlist in view
    Status,
    /// Recover titles of unavailable videos from an earlier backup
    Compare {
        #[arg(value_name = "BACKUP")]
        backup: PathBuf,
        /// Write the merged playlist to merged-complete-<date>.json
        #[arg(long)]
        export: bool,
        /// Save recovered titles into the playlist in view
        #[arg(long)]
        apply: bool,
        /// Print the full comparison as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write every loaded playlist to a backup file
    Backup,
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.log_level);

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: &Config) -> missingtube::Result<()> {
    let store_dir = cli.store.clone().unwrap_or_else(|| config.store_dir.clone());

    match &cli.command {
        Commands::Init => {
            missingtube::initialize_store(&store_dir)?;
            println!("Initialized store in {}", store_dir.display());
        }
        Commands::Import { file } => {
            let info = missingtube::import_playlist(&store_dir, file, Utc::now())?;
            println!("Loaded playlist \"{}\" ({})", info.title, info.id);
        }
        Commands::Status => match missingtube::current_playlist(&store_dir)? {
            Some(playlist) => {
                let unavailable = playlist
                    .videos
                    .iter()
                    .filter(|v| v.unavailable || missingtube::is_unavailable_title(&v.title))
                    .count();
                println!(
                    "{} ({}): {} videos, {} unavailable",
                    playlist.title.as_deref().unwrap_or("Untitled playlist"),
                    playlist.id.as_deref().unwrap_or("-"),
                    playlist.videos.len(),
                    unavailable
                );
            }
            None => println!("No playlist loaded"),
        },
        Commands::Compare {
            backup,
            export,
            apply,
            json,
        } => {
            let result = missingtube::compare_backup(&store_dir, backup)?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_report(&result);
            }

            if *export {
                let path =
                    missingtube::export_merged(&store_dir, &result, &config.export_dir, Utc::now())?;
                println!("Merged playlist written to {}", path.display());
            }
            if *apply && result.has_new_data {
                missingtube::apply_recovery(&store_dir, &result)?;
                println!("Saved recovered titles to the playlist in view");
            }
        }
        Commands::Backup => {
            let path = missingtube::export_all_playlists(&store_dir, &config.export_dir, Utc::now())?;
            println!("Backup written to {}", path.display());
        }
        Commands::Completions { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "missingtube", &mut io::stdout());
        }
    }

    Ok(())
}

fn print_report(result: &ComparisonResult) {
    let count = |status: MatchStatus| result.all_videos.iter().filter(|v| v.status == status).count();

    println!(
        "{} videos: {} recovered, {} matched, {} not in backup",
        result.all_videos.len(),
        count(MatchStatus::UnavailableMatch),
        count(MatchStatus::ExactMatch),
        count(MatchStatus::NoMatch)
    );

    if !result.has_new_data {
        println!("No titles could be recovered from this backup");
        return;
    }

    for recovered in &result.unavailable_matches {
        println!(
            "  #{:<4} {} -> {} [{}] (backup #{})",
            recovered.current_index,
            recovered.current_title,
            recovered.file_title,
            recovered.video_id,
            recovered.file_index
        );
    }
}

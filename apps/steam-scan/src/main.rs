//! gami Steam scanner entry point.

mod app;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use gami_steam::SteamCommand;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gami-steam-scan",
    version,
    about = "Scan local Steam libraries and inspect VDF/ACF files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ~/.config/gami/steam-scan.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum Format {
    /// Human-readable table (default)
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Steam client action for `url`.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Action {
    Run,
    Install,
    Uninstall,
}

impl From<Action> for SteamCommand {
    fn from(a: Action) -> Self {
        match a {
            Action::Run => SteamCommand::Run,
            Action::Install => SteamCommand::Install,
            Action::Uninstall => SteamCommand::Uninstall,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List installed apps from every Steam library
    Scan {
        /// Steam base directory (overrides config and auto-detection)
        #[arg(long)]
        steam_dir: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Decode a VDF/ACF file and print it as JSON
    Parse {
        /// File to decode
        file: PathBuf,
    },
    /// Re-serialize a VDF/ACF file in Steam's layout
    Fmt {
        /// File to format
        file: PathBuf,
        /// Exit with status 1 if the file is not already formatted
        #[arg(long)]
        check: bool,
    },
    /// List Steam accounts that have logged in on this machine
    Users {
        /// Steam base directory (overrides config and auto-detection)
        #[arg(long)]
        steam_dir: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print the steam:// URL for an action on an app
    Url {
        #[arg(value_enum)]
        action: Action,
        app_id: u32,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Scan { steam_dir, format } => {
            app::scan(&config, steam_dir.as_deref(), matches!(format, Format::Json))
        }
        Commands::Parse { file } => app::parse(&config, &file),
        Commands::Fmt { file, check } => app::fmt(&config, &file, check),
        Commands::Users { steam_dir, format } => {
            app::users(&config, steam_dir.as_deref(), matches!(format, Format::Json))
        }
        Commands::Url { action, app_id } => {
            println!("{}", gami_steam::command_url(action.into(), app_id));
            Ok(ExitCode::SUCCESS)
        }
    }
}

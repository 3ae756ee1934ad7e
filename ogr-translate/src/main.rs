//! Point d'entrée CLI pour ogr-translate

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// Charger .env au démarrage
fn load_env() {
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;
mod config;
mod export;
mod input;

use cli::Commands;

/// Traduire des features vers MapInfo et inspecter des datasets NAS
#[derive(Parser)]
#[command(name = "ogr-translate")]
#[command(author, version)]
#[command(about = "Traduire des features GeoJSON vers MapInfo et inspecter des datasets NAS (ALKIS)")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    load_env();

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Sniff { path } => {
            cli::cmd_sniff(&path)?;
        }
        Commands::NasInfo {
            path,
            config,
            relations,
        } => {
            info!(path = %path.display(), "Inspecting NAS dataset");
            cli::cmd_nas_info(&path, config.as_deref(), relations)?;
        }
        Commands::ToMapinfo {
            input,
            output,
            charset,
            config,
        } => {
            info!(input = %input.display(), output = %output.display(), "Translating to MapInfo");
            cli::cmd_to_mapinfo(&input, &output, charset, config.as_deref())?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}

//! joymap - inspect and rewrite joystick button maps

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "joymap")]
#[command(about = "Inspect and rewrite joystick button-map files")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "joymap.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a summary of every device in a button map
    Show { file: PathBuf },
    /// Report devices that cannot be read
    Check { file: PathBuf },
    /// Re-write a button map in canonical form
    Normalize {
        file: PathBuf,
        /// Output path (defaults to rewriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Rewrite in place even if unreadable devices would be dropped
        #[arg(long)]
        force: bool,
    },
    /// Print devices as JSON
    Dump { file: PathBuf },
    /// Write each device into its own file
    Export {
        file: PathBuf,
        /// Target directory (defaults to the configured storage directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Write a default configuration file
    InitConfig,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("joymap v{}", env!("CARGO_PKG_VERSION"));

    let load_config = || config::load_config(&args.config);

    match args.command {
        Command::InitConfig => {
            config::save_default_config(&args.config)?;
            println!("Wrote {}", args.config.display());
        }
        Command::Show { file } => {
            let map = commands::load(&file)?;
            for line in commands::summarize(&map) {
                println!("{}", line);
            }
        }
        Command::Check { file } => {
            let map = commands::load(&file)?;
            println!("{}", commands::check(&map)?);
        }
        Command::Normalize {
            file,
            output,
            force,
        } => {
            let indent = load_config()?.output.indent;
            let (target, map) = commands::normalize(&file, output.as_deref(), force, indent)?;
            println!("Wrote {} devices to {}", map.len(), target.display());
        }
        Command::Dump { file } => {
            let map = commands::load(&file)?;
            println!("{}", commands::dump_json(&map)?);
        }
        Command::Export { file, dir } => {
            let map = commands::load(&file)?;
            let config = load_config()?;
            let dir = dir.unwrap_or(config.storage.directory);
            for path in commands::export(&map, &dir, config.output.indent)? {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

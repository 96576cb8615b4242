use anyhow::Result;
use clap::{Parser, Subcommand};
use stackup::engine::LogOptions;
use stackup::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(
    author,
    version = env!("CARGO_PKG_VERSION"),
    about = "Resolve stack parameters and bring the stack up with dagger",
    long_about = None
)]
struct Cli {
    /// Log format passed to dagger (auto, plain, tty)
    #[arg(long, global = true, default_value = "auto")]
    log_format: String,

    /// Log level passed to dagger (debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the stack's input values and run it
    Up {
        /// Stack directory (defaults to the current directory)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Prompt for values missing from the environment
        #[arg(short, long)]
        interactive: bool,

        /// Input values, e.g. --set name=demo,db.port=5432 (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// Verify the required infrastructure tools are installed
    Check {
        /// Output results as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show declared parameters and where each value would come from
    Schema {
        /// Stack directory (defaults to the current directory)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Output results as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Manage the local stack cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand)]
enum CacheCommands {
    /// Print the cache directory
    Path,

    /// Remove everything in the cache directory
    Clean {
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stackup=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let log = LogOptions {
        format: cli.log_format,
        level: cli.log_level,
    };

    match cli.command {
        Commands::Up {
            dir,
            interactive,
            set,
        } => {
            let config = Config::load(dir)?;
            commands::up::execute(&config, &set, interactive, &log)?;
        }
        Commands::Check { json } => {
            commands::check::execute(json)?;
        }
        Commands::Schema { dir, json } => {
            let config = Config::load(dir)?;
            commands::schema::execute(&config, json)?;
        }
        Commands::Cache { command } => {
            let config = Config::load(None)?;
            match command {
                CacheCommands::Path => commands::cache::path(&config)?,
                CacheCommands::Clean { yes } => commands::cache::clean(&config, yes)?,
            }
        }
    }

    Ok(())
}

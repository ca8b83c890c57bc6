use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use pgbaseline::commands::{self, StatusFormat};
use pgbaseline::config;
use pgbaseline::constants::CONFIG_FILENAME;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(long, default_value = CONFIG_FILENAME, global = true)]
    config_file: String,

    /// Enable verbose output (info level)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Suppress all non-essential output (error level only)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Enable debug output (debug level)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mark an existing schema as already containing everything up to a version
    Baseline {
        #[command(flatten)]
        baseline_args: config::BaselineArgs,

        #[command(flatten)]
        database_args: config::DatabaseArgs,

        #[command(flatten)]
        tracking_table_args: config::TrackingTableArgs,
    },

    /// Show resolved migrations against the tracking table
    Status {
        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: StatusFormat,

        #[command(flatten)]
        database_args: config::DatabaseArgs,

        #[command(flatten)]
        directory_args: config::DirectoryArgs,

        #[command(flatten)]
        tracking_table_args: config::TrackingTableArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    initialize_logging(&cli);

    tokio::select! {
        result = run_main(cli) => result,
        _ = wait_for_shutdown_signal() => {
            // Dropping run_main rolls back any open tracking table transaction
            info!("Received shutdown signal, nothing was recorded");
            Ok(())
        }
    }
}

async fn wait_for_shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn initialize_logging(cli: &Cli) {
    let level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn" // default level
    };

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level)
    };

    fmt().with_env_filter(filter).with_target(false).init();
}

async fn run_main(cli: Cli) -> Result<()> {
    let (file_config, root_dir) = config::load_config(&cli.config_file)?;

    match cli.command {
        Commands::Baseline {
            baseline_args,
            database_args,
            tracking_table_args,
        } => {
            let cli_config = config::ConfigInput {
                database: Some(database_args.into()),
                directories: None,
                tracking_table: Some(tracking_table_args.into()),
                baseline: Some(baseline_args.into()),
            };

            let config = config::ConfigBuilder::new()
                .with_file(file_config)
                .with_cli_args(cli_config)
                .resolve()?;

            info!("Baselining tracking table");
            commands::cmd_baseline(&config, &root_dir).await
        }
        Commands::Status {
            format,
            database_args,
            directory_args,
            tracking_table_args,
        } => {
            let cli_config = config::ConfigInput {
                database: Some(database_args.into()),
                directories: Some(directory_args.into()),
                tracking_table: Some(tracking_table_args.into()),
                baseline: None,
            };

            let config = config::ConfigBuilder::new()
                .with_file(file_config)
                .with_cli_args(cli_config)
                .resolve()?;

            info!("Checking migration status");
            commands::cmd_status(&config, &root_dir, format).await
        }
    }
}

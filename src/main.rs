use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

mod cli;

use cli::Cli;
use cli::commands::Commands;
use engager::client::SimulatedFeedClient;
use engager::config::Config;
use engager::scheduler::Scheduler;
use engager::session::StdinCodePrompt;

fn setup_logging(default_level: &str) -> Result<PathBuf> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("engager")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("engager.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(log_file)
}

async fn run_application(cli: &Cli, config: Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match cli.command.clone().unwrap_or(Commands::Run) {
        Commands::Run => handle_run_command(config).await,
        Commands::Check => handle_check_command(&config),
    }
}

async fn handle_run_command(config: Config) -> Result<()> {
    let username = config.username.clone();
    let scheduler = Scheduler::new(
        config,
        Arc::new(SimulatedFeedClient::default()),
        Arc::new(StdinCodePrompt),
    )
    .context("Invalid configuration")?;

    println!("{} {}", "Engaging as:".green(), username);

    tokio::select! {
        result = scheduler.run() => {
            result.context("Session ended")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
            println!("{}", "Interrupted".yellow());
        }
    }

    let stats = scheduler.stats();
    let stats = stats.lock().map(|s| s.clone()).unwrap_or_else(|p| p.into_inner().clone());
    println!(
        "{} processed={} liked={} commented={} failed={} rate_limited={}",
        "Summary:".cyan(),
        stats.processed,
        stats.liked,
        stats.commented,
        stats.failed,
        stats.rate_limited
    );
    Ok(())
}

fn handle_check_command(config: &Config) -> Result<()> {
    info!("Checking configuration");
    config.validate().context("Invalid configuration")?;

    let yaml = serde_yaml::to_string(&config.redacted()).context("Failed to render configuration")?;
    println!("{}", "Configuration OK".green());
    println!("{}", yaml);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    let level = if cli.is_verbose() {
        "debug".to_string()
    } else {
        config.log_level.clone().unwrap_or_else(|| "info".to_string())
    };
    setup_logging(&level).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, config).await.context("Application failed")?;

    Ok(())
}

use clap::Parser;
use anyhow::Result;
use std::path::PathBuf;
use tracing::{info, error};

use irece_dom::{Config, JournalDownloader};

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "irece_dom=info");
    }

    // Initialize logging to both console and file
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

    let file_appender = tracing_appender::rolling::never(".", "irece-dom.log");

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(EnvFilter::from_default_env())
        )
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env())
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(root) = &cli.root {
        config.root_dir = root.clone();
    }
    config.validate()?;

    let downloader = JournalDownloader::new(&config)?;

    let run = match &cli.command {
        Commands::Day { year, month, day } => {
            info!("Downloading editions of {:04}-{:02}-{:02}", year, month, day);
            downloader.by_day(*year, *month, *day).await
        }
        Commands::Month { year, month } => {
            info!("Downloading editions of {:04}-{:02}", year, month);
            downloader.by_month(*year, *month).await
        }
        Commands::Year { year } => {
            info!("Downloading editions of {}", year);
            downloader.by_year(*year).await
        }
    };

    match run {
        Ok(descriptors) => print_summary(&descriptors),
        Err(e) => {
            error!("Download failed: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}

fn print_summary(descriptors: &[Option<PathBuf>]) {
    let failed = descriptors.iter().filter(|d| d.is_none()).count();

    for descriptor in descriptors.iter().flatten() {
        println!("{}", descriptor.display());
    }

    println!(
        "{} editions, {} recorded, {} failed",
        descriptors.len(),
        descriptors.len() - failed,
        failed
    );
}

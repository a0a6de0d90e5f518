use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "irece-dom")]
#[command(about = "Download editions of the Irecê (BA) municipal official diary and record their metadata")]
#[command(version)]
pub struct Cli {
    /// Root directory for `pdfs/` and `out/` (overrides IRECE_DOM_ROOT_DIR)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download the editions published on a single day
    Day {
        /// Year (e.g. 2022)
        #[arg(short, long)]
        year: i32,

        /// Month (1-12)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,

        /// Day of month (1-31)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=31))]
        day: u32,
    },

    /// Download the editions published in a month
    Month {
        /// Year (e.g. 2022)
        #[arg(short, long)]
        year: i32,

        /// Month (1-12)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
    },

    /// Download the editions published in a year
    Year {
        /// Year (e.g. 2022)
        #[arg(short, long)]
        year: i32,
    },
}

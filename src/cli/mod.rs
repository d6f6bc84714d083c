pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::Rover;

#[derive(Parser)]
#[command(name = "solgrid")]
#[command(about = "Browse Mars rover photos from the terminal", long_about = None)]
pub struct Cli {
    /// Write logs to this file (the TUI logs nowhere otherwise)
    #[arg(long, global = true)]
    pub log: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the TUI (default)
    Tui {
        /// Rover to start with (curiosity, opportunity, spirit, perseverance)
        #[arg(short, long)]
        rover: Option<Rover>,
        /// Sol to start with
        #[arg(short, long)]
        sol: Option<u32>,
    },
    /// Print photos for a rover and sol
    Photos {
        #[arg(short, long, default_value = "curiosity")]
        rover: Rover,
        #[arg(short, long, default_value_t = crate::domain::DEFAULT_SOL)]
        sol: u32,
        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Show the mission manifest for a rover
    Manifest {
        #[arg(short, long, default_value = "curiosity")]
        rover: Rover,
        /// How many recent sols with photos to list
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
}

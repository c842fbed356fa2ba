//! CLI commands

mod info;
mod ledger;
mod predict;
mod serve;

pub use info::info;
pub use ledger::ledger;
pub use predict::predict;
pub use serve::serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Petal - inference gateway for the iris classifier
#[derive(Parser)]
#[command(name = "petal")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML, or JSON by extension)
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start inference server
    Serve {
        /// Model artifact path (overrides MODEL_PATH)
        #[arg(long, short)]
        model: Option<PathBuf>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Stay unready instead of serving the reference model when no artifact exists
        #[arg(long)]
        no_fallback: bool,
    },

    /// Classify one feature vector and record it in the ledger
    Predict {
        /// Model artifact path (overrides MODEL_PATH)
        #[arg(long, short)]
        model: Option<PathBuf>,

        /// Sepal length (cm)
        #[arg(long)]
        sepal_length: f64,

        /// Sepal width (cm)
        #[arg(long)]
        sepal_width: f64,

        /// Petal length (cm)
        #[arg(long)]
        petal_length: f64,

        /// Petal width (cm)
        #[arg(long)]
        petal_width: f64,
    },

    /// Show model artifact information
    Info {
        /// Artifact path (default: configured model path)
        model: Option<PathBuf>,
    },

    /// Show recent prediction ledger entries
    Ledger {
        /// Number of entries to show
        #[arg(long, short = 'n', default_value = "20")]
        limit: u32,

        /// Print entries as JSON lines
        #[arg(long)]
        json: bool,
    },
}

//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mjop_engine::domain::PlanId;

/// Stores MJOP plans and prints their financing reports
#[derive(Debug, Parser)]
#[command(name = "mjop-host")]
#[command(about = "Store MJOP plans and print their financing reports", long_about = None)]
#[command(version)]
pub struct Cli {
    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// What the host was asked to do.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Analyse a stored plan and print its report as JSON
    Analyze {
        /// Id printed by `import`
        id: PlanId,
    },

    /// Store a plan document and print its new id
    Import {
        /// Path to the plan JSON file
        path: PathBuf,
    },
}

//! `mjop-host` binary.

use anyhow::Context;
use clap::Parser;
use mjop_host::cli::{Cli, Command};
use mjop_host::infrastructure::{config::Settings, telemetry::TelemetryBuilder};
use mjop_host::storage::FilePlanRepository;
use mjop_host::{analyze_stored, import_file};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::new().context("Failed to load configuration")?;

    TelemetryBuilder::new("mjop-host", env!("CARGO_PKG_VERSION"))
        .with_log_level(settings.telemetry.log_level.clone())
        .with_json(settings.telemetry.json)
        .init()?;

    settings
        .engine
        .validate()
        .context("Invalid engine configuration")?;

    let repository = FilePlanRepository::new(&settings.storage.dir);
    info!(storage = %repository.dir().display(), "MJOP host starting");

    match cli.command {
        Command::Analyze { id } => {
            let report = analyze_stored(&repository, &id, &settings.engine).await?;
            let json = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
            println!("{json}");
        }
        Command::Import { path } => {
            let id = import_file(&repository, &path).await?;
            println!("{id}");
        }
    }

    Ok(())
}

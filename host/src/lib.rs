//! MJOP host
//!
//! Wires the engine to plan files on disk: settings from the environment,
//! log output, a file-backed plan repository and the two commands of the
//! `mjop-host` binary.

pub mod cli;
pub mod infrastructure;
pub mod storage;

use std::path::Path;

use anyhow::{Context, Result};
use mjop_engine::domain::{Plan, PlanId};
use mjop_engine::{EngineConfig, PlanReport, PlanRepository, analyze};
use tracing::info;

/// Loads a stored plan and analyses it.
///
/// # Errors
/// Returns an error if the plan cannot be loaded or has no cash info.
pub async fn analyze_stored(
    repository: &dyn PlanRepository,
    id: &PlanId,
    config: &EngineConfig,
) -> Result<PlanReport> {
    let plan = repository
        .fetch_plan(id)
        .await
        .with_context(|| format!("Failed to load plan '{id}'"))?;
    let report = analyze(&plan, config).with_context(|| format!("Failed to analyse plan '{id}'"))?;
    Ok(report)
}

/// Stores the plan JSON at `path` as a new plan.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or storing fails.
pub async fn import_file(repository: &dyn PlanRepository, path: &Path) -> Result<PlanId> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let plan: Plan = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a plan document", path.display()))?;
    let id = repository
        .save_plan(None, &plan)
        .await
        .context("Failed to store plan")?;
    info!(plan_id = %id, source = %path.display(), "Imported plan");
    Ok(id)
}

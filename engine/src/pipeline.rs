//! Analysis pipeline.
//!
//! Runs every stage over one plan snapshot: extraction, projection,
//! grouping, timeline and classification. Diagnostics of all stages are
//! collected into the report.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, instrument};

use crate::config::EngineConfig;
use crate::diagnostics::Diagnostics;
use crate::domain::{CashInfo, OfferGroup, OfferGroupId, Plan};
use crate::error::EngineError;
use crate::extraction::{extract_tasks, report_unreadable};
use crate::grouping::{GroupView, TaskView, group};
use crate::projection::{ProjectionPoint, project};
use crate::solvency::{Tier, classify_with, minimum_required};
use crate::timeline::{TimelineOptions, YearBucket, by_year};

/// A projection point with its solvency tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedPoint {
    /// The projected point.
    #[serde(flatten)]
    pub point: ProjectionPoint,
    /// Tier of the balance after this point.
    pub tier: Tier,
}

/// Number of points per tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierCounts {
    /// Points above the minimum reserve.
    pub healthy: usize,
    /// Points between 0 and the minimum reserve.
    pub warning: usize,
    /// Points below 0.
    pub critical: usize,
}

impl TierCounts {
    fn record(&mut self, tier: Tier) {
        match tier {
            Tier::Healthy => self.healthy += 1,
            Tier::Warning => self.warning += 1,
            Tier::Critical => self.critical += 1,
        }
    }
}

/// Headline figures of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Tasks found in the plan.
    pub task_count: usize,
    /// Tasks that made it into the projection.
    pub projected_task_count: usize,
    /// Balance after the last point.
    pub final_balance: f64,
    /// Tier of the final balance.
    pub final_tier: Tier,
    /// Lowest projected balance.
    pub lowest_balance: f64,
    /// Date of the lowest balance.
    pub lowest_balance_date: Option<NaiveDate>,
    /// Minimum reserve the balances are held against.
    pub minimum_required: f64,
    /// Points per tier.
    pub tiers: TierCounts,
}

/// Everything the planning screens show for one plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport {
    /// Normalised reserve-fund parameters.
    pub cash_info: CashInfo,
    /// Classified balance series.
    pub projection: Vec<ClassifiedPoint>,
    /// Offer groups keyed by id.
    pub grouped: BTreeMap<OfferGroupId, GroupView>,
    /// Standalone tasks.
    pub ungrouped: Vec<TaskView>,
    /// Groups and tasks per calendar year.
    pub timeline: BTreeMap<i32, YearBucket>,
    /// Headline figures.
    pub summary: Summary,
    /// Findings of all stages.
    pub diagnostics: Diagnostics,
}

/// Analyses a plan snapshot.
///
/// # Errors
///
/// Returns `EngineError::InvalidConfiguration` if `config` does not
/// validate, and `EngineError::MissingCashInfo` if the plan has no cash info.
#[instrument(skip_all, fields(elements = plan.global_elements.len()))]
pub fn analyze(plan: &Plan, config: &EngineConfig) -> Result<PlanReport, EngineError> {
    config.validate()?;
    let cash_record = plan.cash_info.as_ref().ok_or(EngineError::MissingCashInfo)?;

    let extraction = extract_tasks(&plan.global_elements);
    let mut diagnostics = extraction.diagnostics;
    report_unreadable(&plan.global_elements, "globalElements", &mut diagnostics);
    report_unreadable(&plan.offer_groups, "offerGroups", &mut diagnostics);
    let tasks = extraction.tasks;

    let cash = CashInfo::from_record(cash_record, &mut diagnostics);
    let offer_groups: Vec<OfferGroup> = plan
        .offer_groups
        .iter()
        .map(|record| OfferGroup::from_record(record, &mut diagnostics))
        .collect();

    let projection = project(&cash, &tasks);
    let grouped = group(&tasks, &offer_groups, &projection, config.show_done_tasks);
    let timeline = by_year(
        &grouped.grouped,
        &grouped.ungrouped,
        &TimelineOptions {
            fill_range: config.fill_timeline_range,
        },
    );

    let projected_task_count = projection
        .points()
        .iter()
        .filter(|point| point.task_id.is_some())
        .count();
    let final_balance = projection.final_balance();
    let (lowest_balance, lowest_balance_date) = projection
        .lowest_point()
        .map_or((cash.current_cash, cash.reserve_date), |point| {
            (point.running_balance, point.effective_date)
        });

    let (points, projection_diagnostics) = projection.into_parts();
    diagnostics.extend(projection_diagnostics);
    diagnostics.extend(grouped.diagnostics);

    let mut tiers = TierCounts::default();
    let classified: Vec<ClassifiedPoint> = points
        .into_iter()
        .map(|point| {
            let tier = classify_with(point.running_balance, cash.total_worth, config.minimum_reserve_ratio);
            tiers.record(tier);
            ClassifiedPoint { point, tier }
        })
        .collect();

    let summary = Summary {
        task_count: tasks.len(),
        projected_task_count,
        final_balance,
        final_tier: classify_with(final_balance, cash.total_worth, config.minimum_reserve_ratio),
        lowest_balance,
        lowest_balance_date,
        minimum_required: minimum_required(cash.total_worth, config.minimum_reserve_ratio),
        tiers,
    };

    info!(
        tasks = summary.task_count,
        final_balance,
        final_tier = %summary.final_tier,
        diagnostics = diagnostics.len(),
        "Analysed plan"
    );

    Ok(PlanReport {
        cash_info: cash,
        projection: classified,
        grouped: grouped.grouped,
        ungrouped: grouped.ungrouped,
        timeline,
        summary,
        diagnostics,
    })
}

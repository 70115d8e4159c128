//! Cash projection - the reserve-fund balance over time-ordered tasks.
//!
//! The projection is a strict left fold: tasks are ordered by effective
//! date and each one adjusts the running balance by
//!
//! ```text
//! months       = (task_year - start_year) * 12 + (task_month - start_month)
//! contribution = months * monthly_contribution
//! balance      = balance + contribution - cost
//! ```
//!
//! The contribution of a task is counted from the reserve date every time,
//! not from the previous task, while costs accumulate. Any edit to a task's
//! date or price invalidates every later point, so projections are never
//! cached or patched; they are rebuilt from the task list.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::domain::{CashInfo, Task, TaskId};

/// One step of the projected balance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    /// Task deducted at this point; `None` for the baseline point.
    pub task_id: Option<TaskId>,
    /// Date the task is placed at.
    pub effective_date: Option<NaiveDate>,
    /// Whole months between the reserve date and the task date.
    pub months_since_reserve_start: i32,
    /// Contribution counted from the reserve date up to this task.
    pub contribution_accrued: f64,
    /// Cost deducted at this point.
    pub cost: f64,
    /// Balance after this point.
    pub running_balance: f64,
}

impl ProjectionPoint {
    /// The point standing for the starting balance alone.
    #[must_use]
    pub fn baseline(cash: &CashInfo) -> Self {
        Self {
            task_id: None,
            effective_date: cash.reserve_date,
            months_since_reserve_start: 0,
            contribution_accrued: 0.0,
            cost: 0.0,
            running_balance: cash.current_cash,
        }
    }
}

/// The projected balance series for one task list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    points: Vec<ProjectionPoint>,
    #[serde(skip)]
    positions: HashMap<TaskId, usize>,
    #[serde(skip)]
    diagnostics: Diagnostics,
}

impl Projection {
    /// All points in time order. Never empty.
    #[must_use]
    pub fn points(&self) -> &[ProjectionPoint] {
        &self.points
    }

    /// Findings met while projecting.
    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Index of the point for a task, if the task was projected.
    #[must_use]
    pub fn position_of(&self, id: &TaskId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Balance right after a task, if the task was projected.
    #[must_use]
    pub fn balance_after(&self, id: &TaskId) -> Option<f64> {
        self.position_of(id).map(|i| self.points[i].running_balance)
    }

    /// Balance after the last point.
    #[must_use]
    pub fn final_balance(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.running_balance)
    }

    /// The point with the lowest balance; the earliest one on ties.
    #[must_use]
    pub fn lowest_point(&self) -> Option<&ProjectionPoint> {
        self.points.iter().reduce(|lowest, point| {
            if point.running_balance < lowest.running_balance {
                point
            } else {
                lowest
            }
        })
    }

    /// Splits into the points and the diagnostics.
    #[must_use]
    pub fn into_parts(self) -> (Vec<ProjectionPoint>, Diagnostics) {
        (self.points, self.diagnostics)
    }
}

/// Whole months from `start` to `date`, ignoring the day of month.
///
/// Negative when `date` lies before `start`.
#[must_use]
pub fn months_between(start: NaiveDate, date: NaiveDate) -> i32 {
    #[allow(clippy::cast_possible_wrap)]
    let month_delta = date.month() as i32 - start.month() as i32;
    (date.year() - start.year()) * 12 + month_delta
}

/// Projects the reserve balance over `tasks`.
///
/// Tasks are placed at their effective date and sorted stably, so tasks on
/// the same date keep their input order and re-running on an unchanged list
/// reproduces the same series. Tasks with no effective date are left out and
/// reported. With nothing to project the result is a single baseline point
/// holding the starting balance.
#[must_use]
#[instrument(skip_all, fields(tasks = tasks.len()))]
pub fn project(cash: &CashInfo, tasks: &[Task]) -> Projection {
    let mut diagnostics = Diagnostics::new();

    let mut dated: Vec<(NaiveDate, &Task)> = Vec::with_capacity(tasks.len());
    for task in tasks {
        match task.effective_date() {
            Some(date) => dated.push((date, task)),
            None => diagnostics.push(Diagnostic::MissingDate {
                task_id: task.id.clone(),
            }),
        }
    }
    // Vec::sort_by_key is stable.
    dated.sort_by_key(|(date, _)| *date);

    if dated.is_empty() {
        return Projection {
            points: vec![ProjectionPoint::baseline(cash)],
            positions: HashMap::new(),
            diagnostics,
        };
    }

    let mut points = Vec::with_capacity(dated.len());
    let mut positions = HashMap::with_capacity(dated.len());
    let mut running_balance = cash.current_cash;

    for (index, (date, task)) in dated.into_iter().enumerate() {
        let months = cash.reserve_date.map_or(0, |start| months_between(start, date));
        let contribution_accrued = f64::from(months) * cash.monthly_contribution;
        let cost = task.effective_cost();
        running_balance = running_balance + contribution_accrued - cost;

        // Id-less tasks are reported at extraction and get no lookup.
        if !task.id.is_empty() && positions.insert(task.id.clone(), index).is_some() {
            diagnostics.push(Diagnostic::DuplicateTaskId {
                task_id: task.id.clone(),
            });
        }
        points.push(ProjectionPoint {
            task_id: Some(task.id.clone()),
            effective_date: Some(date),
            months_since_reserve_start: months,
            contribution_accrued,
            cost,
            running_balance,
        });
    }

    debug!(
        points = points.len(),
        final_balance = running_balance,
        "Projected reserve balance"
    );
    Projection {
        points,
        positions,
        diagnostics,
    }
}

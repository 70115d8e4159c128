//! Grouping - offer-group bundles versus standalone tasks.
//!
//! Tasks carrying an `offerGroupId` are collected under their group, every
//! other task stays standalone. Each group gets its totals (cost, urgency,
//! remaining cash once all its tasks are paid) and each task its own
//! projected remaining cash.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::domain::{OfferGroup, OfferGroupId, Task, Urgency};
use crate::projection::Projection;

/// A task with its projected remaining cash.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    /// The task.
    #[serde(flatten)]
    pub task: Task,
    /// Balance right after this task; `None` when it was not projected.
    pub remaining_cash: Option<f64>,
}

impl TaskView {
    /// Date the task is shown at.
    #[must_use]
    pub fn display_date(&self) -> Option<NaiveDate> {
        self.task.effective_date()
    }

    /// Cost the task adds.
    #[must_use]
    pub const fn cost(&self) -> f64 {
        self.task.effective_cost()
    }
}

/// One offer group with its member tasks and totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupView {
    /// Group identifier.
    pub offer_group_id: OfferGroupId,
    /// Group name, or the placeholder name for a dangling reference.
    pub group_name: String,
    /// Synthesized because no group with this id exists.
    pub placeholder: bool,
    /// Member tasks in projection order.
    pub tasks: Vec<TaskView>,
    /// Sum of member costs, or the group price when not priced per task.
    pub total_cost: f64,
    /// Highest member urgency.
    pub group_urgency: Option<Urgency>,
    /// Balance once the last member task is paid.
    pub total_remaining_cash: Option<f64>,
    /// Group work date, else the earliest member date.
    pub display_date: Option<NaiveDate>,
}

/// Tasks split into offer groups and standalone tasks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupedView {
    /// Groups keyed by id.
    pub grouped: BTreeMap<OfferGroupId, GroupView>,
    /// Standalone tasks in projection order.
    pub ungrouped: Vec<TaskView>,
    /// Findings met while grouping.
    #[serde(skip)]
    pub diagnostics: Diagnostics,
}

/// Partitions tasks into offer groups and standalone tasks.
///
/// Tasks inspected as done are dropped unless `show_done_tasks` is set.
/// A task whose group no longer exists is collected under a placeholder
/// group and reported. Member and standalone lists follow the projection
/// order, tasks left out of the projection last in input order, so equal
/// inputs always give equal output.
#[must_use]
#[instrument(skip_all, fields(tasks = tasks.len(), groups = offer_groups.len()))]
pub fn group(
    tasks: &[Task],
    offer_groups: &[OfferGroup],
    projection: &Projection,
    show_done_tasks: bool,
) -> GroupedView {
    let mut diagnostics = Diagnostics::new();
    let known: HashMap<&OfferGroupId, &OfferGroup> = offer_groups
        .iter()
        .map(|group| (&group.offer_group_id, group))
        .collect();

    let mut visible: Vec<(usize, usize, &Task)> = tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| show_done_tasks || !task.inspection_done)
        .map(|(index, task)| {
            let position = projection.position_of(&task.id).unwrap_or(usize::MAX);
            (position, index, task)
        })
        .collect();
    visible.sort_by_key(|(position, index, _)| (*position, *index));

    let mut members: BTreeMap<OfferGroupId, Vec<TaskView>> = BTreeMap::new();
    let mut ungrouped = Vec::new();
    for (_, _, task) in visible {
        let view = TaskView {
            task: task.clone(),
            remaining_cash: projection.balance_after(&task.id),
        };
        match &task.offer_group_id {
            Some(group_id) => members.entry(group_id.clone()).or_default().push(view),
            None => ungrouped.push(view),
        }
    }

    let grouped: BTreeMap<OfferGroupId, GroupView> = members
        .into_iter()
        .map(|(group_id, tasks)| {
            let (group, placeholder) = match known.get(&group_id) {
                Some(group) => ((*group).clone(), false),
                None => {
                    for view in &tasks {
                        diagnostics.push(Diagnostic::DanglingGroup {
                            task_id: view.task.id.clone(),
                            offer_group_id: group_id.clone(),
                        });
                    }
                    (OfferGroup::placeholder(group_id.clone()), true)
                }
            };
            let view = build_group_view(&group, placeholder, tasks, projection);
            (group_id, view)
        })
        .collect();

    debug!(
        groups = grouped.len(),
        ungrouped = ungrouped.len(),
        "Grouped tasks"
    );
    GroupedView {
        grouped,
        ungrouped,
        diagnostics,
    }
}

fn build_group_view(
    group: &OfferGroup,
    placeholder: bool,
    tasks: Vec<TaskView>,
    projection: &Projection,
) -> GroupView {
    let total_cost = if group.assign_prices_individually {
        tasks.iter().map(TaskView::cost).sum()
    } else {
        group.cost
    };
    let group_urgency = tasks.iter().filter_map(|view| view.task.urgency).max();
    let total_remaining_cash = tasks
        .iter()
        .filter_map(|view| projection.position_of(&view.task.id))
        .max()
        .map(|last| projection.points()[last].running_balance);
    let display_date = group
        .group_work_date
        .or_else(|| tasks.iter().filter_map(TaskView::display_date).min());

    GroupView {
        offer_group_id: group.offer_group_id.clone(),
        group_name: group.name.clone(),
        placeholder,
        tasks,
        total_cost,
        group_urgency,
        total_remaining_cash,
        display_date,
    }
}

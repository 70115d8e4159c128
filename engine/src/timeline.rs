//! Year-by-year timeline of groups and standalone tasks.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::OfferGroupId;
use crate::grouping::{GroupView, TaskView};

/// An item shown on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TimelineEntry {
    /// An offer group with its members.
    Group(GroupView),
    /// A standalone task.
    Task(TaskView),
}

impl TimelineEntry {
    /// Date the entry is placed at.
    #[must_use]
    pub fn display_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Group(group) => group.display_date,
            Self::Task(task) => task.display_date(),
        }
    }

    /// Cost the entry adds to its year.
    #[must_use]
    pub const fn cost(&self) -> f64 {
        match self {
            Self::Group(group) => group.total_cost,
            Self::Task(task) => task.cost(),
        }
    }
}

/// All entries of one calendar year.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearBucket {
    /// Groups and tasks dated in this year, by date.
    pub task_groups: Vec<TimelineEntry>,
    /// Sum of group totals and task costs.
    pub total_cost: f64,
}

/// Options for [`by_year`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimelineOptions {
    /// Inclusive year range that always appears, empty years included.
    pub fill_range: Option<(i32, i32)>,
}

impl TimelineOptions {
    /// Always covers `first..=last`.
    #[must_use]
    pub const fn filled(first: i32, last: i32) -> Self {
        Self {
            fill_range: Some((first, last)),
        }
    }
}

/// Buckets groups and standalone tasks by calendar year.
///
/// A group is placed at its group work date, else at its earliest member
/// date; a standalone task at its effective date. Entries without any date
/// are left off. Only years holding entries appear, unless
/// `options.fill_range` asks for a full range; entries outside that range
/// still get their own year.
#[must_use]
#[instrument(skip_all, fields(groups = grouped.len(), ungrouped = ungrouped.len()))]
pub fn by_year(
    grouped: &BTreeMap<OfferGroupId, GroupView>,
    ungrouped: &[TaskView],
    options: &TimelineOptions,
) -> BTreeMap<i32, YearBucket> {
    let mut years: BTreeMap<i32, YearBucket> = BTreeMap::new();
    if let Some((first, last)) = options.fill_range {
        for year in first.min(last)..=first.max(last) {
            years.insert(year, YearBucket::default());
        }
    }

    let entries = grouped
        .values()
        .cloned()
        .map(TimelineEntry::Group)
        .chain(ungrouped.iter().cloned().map(TimelineEntry::Task));

    let mut skipped = 0_usize;
    for entry in entries {
        let Some(date) = entry.display_date() else {
            skipped += 1;
            continue;
        };
        let bucket = years.entry(date.year()).or_default();
        bucket.total_cost += entry.cost();
        bucket.task_groups.push(entry);
    }

    for bucket in years.values_mut() {
        // Stable, so same-day entries keep groups before tasks.
        bucket.task_groups.sort_by_key(TimelineEntry::display_date);
    }

    debug!(years = years.len(), skipped, "Built timeline");
    years
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CashInfo, OfferGroup, PlannedCost, Task};
    use crate::grouping::group;
    use crate::projection::project;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: &str, on: NaiveDate, cost: f64) -> Task {
        Task::new(id, "e1")
            .with_work_date(on)
            .with_cost(PlannedCost::Estimate(cost))
    }

    fn timeline(tasks: &[Task], groups: &[OfferGroup], options: &TimelineOptions) -> BTreeMap<i32, YearBucket> {
        let cash = CashInfo::new(0.0, 0.0, date(2024, 1, 1), 0.0);
        let view = group(tasks, groups, &project(&cash, tasks), false);
        by_year(&view.grouped, &view.ungrouped, options)
    }

    #[test]
    fn sums_groups_and_tasks_per_year() {
        let tasks = [
            task("g1-a", date(2024, 3, 1), 100.0).in_group("g1"),
            task("solo", date(2025, 11, 1), 500.0),
        ];
        let groups = [OfferGroup::fixed_price("g1", "Facade", 3000.0).with_work_date(date(2025, 6, 1))];
        let years = timeline(&tasks, &groups, &TimelineOptions::default());

        assert_eq!(years.keys().copied().collect::<Vec<_>>(), vec![2025]);
        let y2025 = &years[&2025];
        assert!((y2025.total_cost - 3500.0).abs() < f64::EPSILON);
        assert_eq!(y2025.task_groups.len(), 2);
        assert!(matches!(y2025.task_groups[0], TimelineEntry::Group(_)));
        assert!(matches!(y2025.task_groups[1], TimelineEntry::Task(_)));
    }

    #[test]
    fn group_without_work_date_uses_earliest_member() {
        let tasks = [
            task("a", date(2027, 2, 1), 10.0).in_group("g1"),
            task("b", date(2026, 9, 1), 20.0).in_group("g1"),
        ];
        let groups = [OfferGroup::individually_priced("g1", "Gutters")];
        let years = timeline(&tasks, &groups, &TimelineOptions::default());

        assert_eq!(years.keys().copied().collect::<Vec<_>>(), vec![2026]);
        assert!((years[&2026].total_cost - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn fill_range_adds_empty_years() {
        let tasks = [task("solo", date(2026, 1, 1), 75.0)];
        let years = timeline(&tasks, &[], &TimelineOptions::filled(2024, 2027));

        assert_eq!(
            years.keys().copied().collect::<Vec<_>>(),
            vec![2024, 2025, 2026, 2027]
        );
        assert!(years[&2024].task_groups.is_empty());
        assert!(years[&2024].total_cost.abs() < f64::EPSILON);
        assert!((years[&2026].total_cost - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn entries_outside_fill_range_keep_their_year() {
        let tasks = [task("far", date(2040, 1, 1), 1.0)];
        let years = timeline(&tasks, &[], &TimelineOptions::filled(2024, 2025));
        assert_eq!(
            years.keys().copied().collect::<Vec<_>>(),
            vec![2024, 2025, 2040]
        );
    }

    #[test]
    fn undated_entries_are_left_off() {
        let tasks = [Task::new("nowhen", "e1").with_cost(PlannedCost::Offer(10.0))];
        let years = timeline(&tasks, &[], &TimelineOptions::default());
        assert!(years.is_empty());
    }

    #[test]
    fn entries_within_a_year_are_date_ordered() {
        let tasks = [
            task("dec", date(2025, 12, 1), 1.0),
            task("jan", date(2025, 1, 1), 1.0),
        ];
        let years = timeline(&tasks, &[], &TimelineOptions::default());
        let dates: Vec<_> = years[&2025]
            .task_groups
            .iter()
            .map(TimelineEntry::display_date)
            .collect();
        assert_eq!(dates, vec![Some(date(2025, 1, 1)), Some(date(2025, 12, 1))]);
    }
}

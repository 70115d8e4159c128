//! Task extraction - flattens element → inspection report → task.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::domain::{Element, Records, Task};

/// Flat task list taken from a plan's elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Extraction {
    /// Normalised tasks in element, report, task order.
    pub tasks: Vec<Task>,
    /// Findings met while normalising.
    pub diagnostics: Diagnostics,
}

/// Flattens every task of every inspection report of every element.
///
/// Each task is annotated with the id of the element it was found under.
/// Elements without reports and reports without tasks contribute nothing.
/// Stored reports or tasks that are not records are reported and skipped.
/// The order of the result is the nesting order and carries no meaning;
/// time ordering is the projection's job.
#[must_use]
#[instrument(skip_all, fields(elements = elements.len()))]
pub fn extract_tasks(elements: &[Element]) -> Extraction {
    let mut diagnostics = Diagnostics::new();
    for element in elements {
        report_unreadable(&element.inspection_report, "inspectionReport", &mut diagnostics);
        for report in &element.inspection_report {
            report_unreadable(&report.tasks, "tasks", &mut diagnostics);
        }
    }

    let tasks: Vec<Task> = elements
        .iter()
        .flat_map(|element| {
            element
                .inspection_report
                .iter()
                .flat_map(|report| report.tasks.iter())
                .map(move |record| (element, record))
        })
        .map(|(element, record)| Task::from_record(record, &element.id, &mut diagnostics))
        .collect();

    debug!(tasks = tasks.len(), "Extracted tasks");
    Extraction { tasks, diagnostics }
}

/// Records a diagnostic for every stored item of `list` that is not a record.
pub fn report_unreadable<T>(list: &Records<T>, name: &'static str, diagnostics: &mut Diagnostics) {
    for raw in list.unreadable() {
        diagnostics.push(Diagnostic::UnreadableRecord {
            list: name,
            value: raw.to_string(),
        });
    }
}

//! Plan State - edits as a reducer over an immutable snapshot.
//!
//! Every edit the planning screens make is an [`Action`]. [`dispatch`] applies
//! one action to a snapshot and returns the next plan; a rejected action
//! leaves the snapshot as it was. Financial views are computed on top of a
//! snapshot by [`crate::analyze`] and are never stored in the plan.

use serde_json::Value;
use tracing::{debug, instrument};

use crate::domain::{
    CashInfoRecord, Element, ElementId, InspectionReport, OfferGroupId, OfferGroupRecord, Plan,
    TaskId, TaskRecord,
};
use crate::error::StateError;

/// An edit to a plan.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replaces the general information.
    SetGeneralInfo(Value),
    /// Replaces the reserve-fund parameters.
    SetCashInfo(CashInfoRecord),
    /// Inserts an element, or replaces the one with the same id.
    UpsertElement(Element),
    /// Removes an element and all of its tasks.
    RemoveElement(ElementId),
    /// Adds a task to the latest inspection report of an element.
    AddTask {
        /// Element to add the task to.
        element_id: ElementId,
        /// The new task.
        task: TaskRecord,
    },
    /// Replaces the task with the same id.
    UpdateTask(TaskRecord),
    /// Removes a task.
    RemoveTask(TaskId),
    /// Marks a task as inspected done or reopens it.
    SetInspectionDone {
        /// Task to update.
        task_id: TaskId,
        /// New flag value.
        done: bool,
    },
    /// Adds an offer group.
    CreateOfferGroup(OfferGroupRecord),
    /// Renames an offer group.
    RenameOfferGroup {
        /// Group to rename.
        id: OfferGroupId,
        /// New display name.
        name: String,
    },
    /// Deletes an offer group; its members become standalone tasks.
    DeleteOfferGroup(OfferGroupId),
    /// Moves a task into an offer group, or out of any group with `None`.
    AssignToGroup {
        /// Task to move.
        task_id: TaskId,
        /// Target group.
        offer_group_id: Option<OfferGroupId>,
    },
    /// Replaces the spaces list.
    SetSpaces(Value),
    /// Replaces the document metadata.
    SetDocuments(Value),
}

impl Action {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetGeneralInfo(_) => "set_general_info",
            Self::SetCashInfo(_) => "set_cash_info",
            Self::UpsertElement(_) => "upsert_element",
            Self::RemoveElement(_) => "remove_element",
            Self::AddTask { .. } => "add_task",
            Self::UpdateTask(_) => "update_task",
            Self::RemoveTask(_) => "remove_task",
            Self::SetInspectionDone { .. } => "set_inspection_done",
            Self::CreateOfferGroup(_) => "create_offer_group",
            Self::RenameOfferGroup { .. } => "rename_offer_group",
            Self::DeleteOfferGroup(_) => "delete_offer_group",
            Self::AssignToGroup { .. } => "assign_to_group",
            Self::SetSpaces(_) => "set_spaces",
            Self::SetDocuments(_) => "set_documents",
        }
    }
}

/// Applies `action` to `state` and returns the resulting plan.
///
/// # Errors
///
/// Returns `StateError` if:
/// - The targeted element, task or offer group does not exist
/// - A new task or offer group reuses an existing id
/// - A new element, task or offer group has an empty id
#[instrument(skip_all, fields(action = action.name()))]
pub fn dispatch(state: &Plan, action: Action) -> Result<Plan, StateError> {
    let mut next = state.clone();
    match action {
        Action::SetGeneralInfo(info) => next.general_info = info,
        Action::SetCashInfo(cash) => next.cash_info = Some(cash),
        Action::UpsertElement(element) => upsert_element(&mut next, element)?,
        Action::RemoveElement(id) => {
            let before = next.global_elements.len();
            next.global_elements.retain(|element| element.id != id);
            if next.global_elements.len() == before {
                return Err(StateError::ElementNotFound(id));
            }
        }
        Action::AddTask { element_id, task } => add_task(&mut next, &element_id, task)?,
        Action::UpdateTask(task) => {
            let slot = next
                .find_task_mut(&task.id)
                .ok_or_else(|| StateError::TaskNotFound(task.id.clone()))?;
            *slot = task;
        }
        Action::RemoveTask(id) => remove_task(&mut next, &id)?,
        Action::SetInspectionDone { task_id, done } => {
            task_mut(&mut next, &task_id)?.inspection_done = done;
        }
        Action::CreateOfferGroup(group) => {
            if group.offer_group_id.is_empty() {
                return Err(StateError::EmptyId {
                    record: "Offer group",
                });
            }
            if next.find_offer_group(&group.offer_group_id).is_some() {
                return Err(StateError::DuplicateOfferGroup(group.offer_group_id));
            }
            next.offer_groups.push(group);
        }
        Action::RenameOfferGroup { id, name } => {
            let group = next
                .offer_groups
                .iter_mut()
                .find(|group| group.offer_group_id == id)
                .ok_or(StateError::OfferGroupNotFound(id))?;
            group.name = Some(name);
        }
        Action::DeleteOfferGroup(id) => delete_offer_group(&mut next, &id)?,
        Action::AssignToGroup {
            task_id,
            offer_group_id,
        } => {
            if let Some(group_id) = &offer_group_id {
                if next.find_offer_group(group_id).is_none() {
                    return Err(StateError::OfferGroupNotFound(group_id.clone()));
                }
            }
            task_mut(&mut next, &task_id)?.offer_group_id = offer_group_id;
        }
        Action::SetSpaces(spaces) => next.global_spaces = spaces,
        Action::SetDocuments(documents) => next.global_documents = documents,
    }
    debug!("Applied action");
    Ok(next)
}

fn task_mut<'a>(plan: &'a mut Plan, id: &TaskId) -> Result<&'a mut TaskRecord, StateError> {
    plan.find_task_mut(id)
        .ok_or_else(|| StateError::TaskNotFound(id.clone()))
}

fn upsert_element(plan: &mut Plan, element: Element) -> Result<(), StateError> {
    if element.id.is_empty() {
        return Err(StateError::EmptyId { record: "Element" });
    }
    match plan
        .global_elements
        .iter_mut()
        .find(|existing| existing.id == element.id)
    {
        Some(existing) => *existing = element,
        None => plan.global_elements.push(element),
    }
    Ok(())
}

fn add_task(plan: &mut Plan, element_id: &ElementId, task: TaskRecord) -> Result<(), StateError> {
    if task.id.is_empty() {
        return Err(StateError::EmptyId { record: "Task" });
    }
    if plan.find_task(&task.id).is_some() {
        return Err(StateError::DuplicateTask(task.id));
    }
    let element = plan
        .global_elements
        .iter_mut()
        .find(|element| &element.id == element_id)
        .ok_or_else(|| StateError::ElementNotFound(element_id.clone()))?;

    if element.inspection_report.is_empty() {
        element.inspection_report.push(InspectionReport::default());
    }
    if let Some(report) = element.inspection_report.last_mut() {
        report.tasks.push(task);
    }
    Ok(())
}

fn remove_task(plan: &mut Plan, id: &TaskId) -> Result<(), StateError> {
    for report in plan
        .global_elements
        .iter_mut()
        .flat_map(|element| element.inspection_report.iter_mut())
    {
        if let Some(index) = report.tasks.iter().position(|task| &task.id == id) {
            report.tasks.remove(index);
            return Ok(());
        }
    }
    Err(StateError::TaskNotFound(id.clone()))
}

fn delete_offer_group(plan: &mut Plan, id: &OfferGroupId) -> Result<(), StateError> {
    let before = plan.offer_groups.len();
    plan.offer_groups.retain(|group| &group.offer_group_id != id);
    if plan.offer_groups.len() == before {
        return Err(StateError::OfferGroupNotFound(id.clone()));
    }

    let mut orphaned = 0_usize;
    for task in plan
        .global_elements
        .iter_mut()
        .flat_map(|element| element.inspection_report.iter_mut())
        .flat_map(|report| report.tasks.iter_mut())
        .filter(|task| task.offer_group_id.as_ref() == Some(id))
    {
        task.offer_group_id = None;
        orphaned += 1;
    }
    debug!(offer_group_id = %id, orphaned, "Deleted offer group");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plan() -> Plan {
        serde_json::from_value(json!({
            "cashInfo": {"currentCash": 1000, "monthlyContribution": 100, "reserveDate": "2024-01-01"},
            "globalElements": [
                {"id": "roof", "inspectionReport": [
                    {"tasks": [{"id": "t1", "offerGroupId": "g1"}]},
                    {"tasks": [{"id": "t2", "offerGroupId": "g1"}]}
                ]},
                {"id": "door"}
            ],
            "offerGroups": [{"offerGroupId": "g1", "name": "Roofing"}]
        }))
        .unwrap()
    }

    fn record(id: &str) -> TaskRecord {
        TaskRecord {
            id: TaskId::new(id),
            ..TaskRecord::default()
        }
    }

    #[test]
    fn add_task_goes_to_latest_report() {
        let next = dispatch(
            &plan(),
            Action::AddTask {
                element_id: ElementId::new("roof"),
                task: record("t3"),
            },
        )
        .unwrap();

        let roof = next.find_element(&ElementId::new("roof")).unwrap();
        let latest: Vec<_> = roof.inspection_report[1].tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(latest, vec!["t2", "t3"]);
    }

    #[test]
    fn add_task_creates_report_when_element_has_none() {
        let next = dispatch(
            &plan(),
            Action::AddTask {
                element_id: ElementId::new("door"),
                task: record("d1"),
            },
        )
        .unwrap();

        let door = next.find_element(&ElementId::new("door")).unwrap();
        assert_eq!(door.inspection_report.len(), 1);
        assert_eq!(door.inspection_report[0].tasks[0].id, TaskId::new("d1"));
    }

    #[test]
    fn rejected_actions_leave_state_untouched() {
        let state = plan();
        let cases = [
            (
                Action::AddTask {
                    element_id: ElementId::new("roof"),
                    task: record("t1"),
                },
                StateError::DuplicateTask(TaskId::new("t1")),
            ),
            (
                Action::AddTask {
                    element_id: ElementId::new("nope"),
                    task: record("t9"),
                },
                StateError::ElementNotFound(ElementId::new("nope")),
            ),
            (
                Action::AddTask {
                    element_id: ElementId::new("roof"),
                    task: record(""),
                },
                StateError::EmptyId { record: "Task" },
            ),
            (
                Action::RemoveTask(TaskId::new("t9")),
                StateError::TaskNotFound(TaskId::new("t9")),
            ),
            (
                Action::DeleteOfferGroup(OfferGroupId::new("g9")),
                StateError::OfferGroupNotFound(OfferGroupId::new("g9")),
            ),
            (
                Action::AssignToGroup {
                    task_id: TaskId::new("t1"),
                    offer_group_id: Some(OfferGroupId::new("g9")),
                },
                StateError::OfferGroupNotFound(OfferGroupId::new("g9")),
            ),
        ];

        for (action, expected) in cases {
            assert_eq!(dispatch(&state, action), Err(expected));
        }
        assert_eq!(state, plan());
    }

    #[test]
    fn deleting_a_group_orphans_its_members() {
        let next = dispatch(&plan(), Action::DeleteOfferGroup(OfferGroupId::new("g1"))).unwrap();

        assert!(next.offer_groups.is_empty());
        assert!(next.task_records().all(|(_, task)| task.offer_group_id.is_none()));
    }

    #[test]
    fn duplicate_offer_group_is_rejected() {
        let group = OfferGroupRecord {
            offer_group_id: OfferGroupId::new("g1"),
            ..OfferGroupRecord::default()
        };
        assert_eq!(
            dispatch(&plan(), Action::CreateOfferGroup(group)),
            Err(StateError::DuplicateOfferGroup(OfferGroupId::new("g1")))
        );
    }

    #[test]
    fn assign_and_unassign() {
        let state = plan();
        let group = OfferGroupRecord {
            offer_group_id: OfferGroupId::new("g2"),
            name: Some("Gutters".to_string()),
            ..OfferGroupRecord::default()
        };
        let state = dispatch(&state, Action::CreateOfferGroup(group)).unwrap();
        let state = dispatch(
            &state,
            Action::AssignToGroup {
                task_id: TaskId::new("t1"),
                offer_group_id: Some(OfferGroupId::new("g2")),
            },
        )
        .unwrap();
        assert_eq!(
            state.find_task(&TaskId::new("t1")).unwrap().offer_group_id,
            Some(OfferGroupId::new("g2"))
        );

        let state = dispatch(
            &state,
            Action::AssignToGroup {
                task_id: TaskId::new("t1"),
                offer_group_id: None,
            },
        )
        .unwrap();
        assert!(state.find_task(&TaskId::new("t1")).unwrap().offer_group_id.is_none());
    }

    #[test]
    fn update_and_mark_done() {
        let mut changed = record("t2");
        changed.description = Some("Replace tiles".to_string());
        let state = dispatch(&plan(), Action::UpdateTask(changed)).unwrap();
        let state = dispatch(
            &state,
            Action::SetInspectionDone {
                task_id: TaskId::new("t2"),
                done: true,
            },
        )
        .unwrap();

        let task = state.find_task(&TaskId::new("t2")).unwrap();
        assert_eq!(task.description.as_deref(), Some("Replace tiles"));
        assert!(task.inspection_done);
    }

    #[test]
    fn rename_and_remove() {
        let state = dispatch(
            &plan(),
            Action::RenameOfferGroup {
                id: OfferGroupId::new("g1"),
                name: "Roof and gutters".to_string(),
            },
        )
        .unwrap();
        assert_eq!(
            state.find_offer_group(&OfferGroupId::new("g1")).unwrap().name.as_deref(),
            Some("Roof and gutters")
        );

        let state = dispatch(&state, Action::RemoveTask(TaskId::new("t1"))).unwrap();
        assert!(state.find_task(&TaskId::new("t1")).is_none());

        let state = dispatch(&state, Action::RemoveElement(ElementId::new("roof"))).unwrap();
        assert_eq!(state.task_records().count(), 0);
    }

    #[test]
    fn upsert_replaces_existing_element() {
        let element = Element {
            id: ElementId::new("door"),
            ..Element::default()
        };
        let mut extra = element.clone();
        extra.extra.insert("name".to_string(), json!("Front door"));

        let state = dispatch(&plan(), Action::UpsertElement(extra)).unwrap();
        assert_eq!(state.global_elements.len(), 2);
        assert_eq!(state.global_elements[1].extra["name"], json!("Front door"));

        let state = dispatch(
            &state,
            Action::UpsertElement(Element {
                id: ElementId::new("facade"),
                ..element
            }),
        )
        .unwrap();
        assert_eq!(state.global_elements.len(), 3);
    }

    #[test]
    fn pass_through_sections_are_replaced() {
        let state = dispatch(&plan(), Action::SetSpaces(json!([{"id": "s1"}]))).unwrap();
        let state = dispatch(&state, Action::SetDocuments(json!([]))).unwrap();
        let state = dispatch(&state, Action::SetGeneralInfo(json!({"name": "VvE Dorpsstraat"}))).unwrap();
        assert_eq!(state.global_spaces, json!([{"id": "s1"}]));
        assert_eq!(state.global_documents, json!([]));
        assert_eq!(state.general_info["name"], json!("VvE Dorpsstraat"));
    }
}

//! Stored plan records.
//!
//! These types mirror the JSON the persistence service stores for one plan.
//! Field names are the wire contract and must not change.
//!
//! Nothing stored is dropped on a load/save cycle. Fields a record does not
//! model go to a flattened `extra` map and list items without the record
//! shape are kept aside by [`Records`], both written back unchanged. Modelled
//! fields are written back in their normalised form: identifiers as strings,
//! flags as booleans, a blank or absent `offerGroupId` as `null`, and `null`
//! free text left out. Absent or `null` pass-through sections stay absent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ids::{ElementId, OfferGroupId, TaskId, optional_id};
use super::lenient;
use super::records::Records;

/// The MJOP aggregate for one building.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Free-form general information about the building.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub general_info: Value,
    /// Reserve-fund parameters; `None` when never filled in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_info: Option<CashInfoRecord>,
    /// Inspected elements with their reports and tasks.
    #[serde(default)]
    pub global_elements: Records<Element>,
    /// Spaces, owned by the space forms and passed through untouched.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub global_spaces: Value,
    /// Document metadata, owned by the document store and passed through.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub global_documents: Value,
    /// Offer groups referenced by tasks.
    #[serde(default)]
    pub offer_groups: Records<OfferGroupRecord>,
    /// Unmodelled top-level fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Plan {
    /// Iterates over every task record together with its owning element.
    pub fn task_records(&self) -> impl Iterator<Item = (&ElementId, &TaskRecord)> {
        self.global_elements.iter().flat_map(|element| {
            element
                .inspection_report
                .iter()
                .flat_map(|report| report.tasks.iter())
                .map(move |task| (&element.id, task))
        })
    }

    /// Finds a task record by id.
    #[must_use]
    pub fn find_task(&self, id: &TaskId) -> Option<&TaskRecord> {
        self.task_records()
            .map(|(_, task)| task)
            .find(|task| &task.id == id)
    }

    /// Finds a task record by id for modification.
    pub fn find_task_mut(&mut self, id: &TaskId) -> Option<&mut TaskRecord> {
        self.global_elements
            .iter_mut()
            .flat_map(|element| element.inspection_report.iter_mut())
            .flat_map(|report| report.tasks.iter_mut())
            .find(|task| &task.id == id)
    }

    /// Finds an element by id.
    #[must_use]
    pub fn find_element(&self, id: &ElementId) -> Option<&Element> {
        self.global_elements.iter().find(|element| &element.id == id)
    }

    /// Finds an offer group by id.
    #[must_use]
    pub fn find_offer_group(&self, id: &OfferGroupId) -> Option<&OfferGroupRecord> {
        self.offer_groups
            .iter()
            .find(|group| &group.offer_group_id == id)
    }
}

/// An inspected building element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Element identifier.
    #[serde(default)]
    pub id: ElementId,
    /// Inspection reports, oldest first.
    #[serde(default)]
    pub inspection_report: Records<InspectionReport>,
    /// Unmodelled element fields (name, condition, photos, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One inspection of an element and the tasks it produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionReport {
    /// Tasks raised by this inspection.
    #[serde(default)]
    pub tasks: Records<TaskRecord>,
    /// Unmodelled report fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A stored maintenance task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    /// Task identifier.
    #[serde(default)]
    pub id: TaskId,
    /// Free-text description.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Classification chosen in the task form.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Raw urgency, expected 1-6.
    #[serde(default, deserialize_with = "lenient::present", skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Value>,
    /// Set once the work has been inspected as done.
    #[serde(default, deserialize_with = "lenient::flag")]
    pub inspection_done: bool,
    /// Offer group the task is bundled into.
    #[serde(default, deserialize_with = "optional_id")]
    pub offer_group_id: Option<OfferGroupId>,
    /// Planning details.
    #[serde(default, deserialize_with = "lenient::record_or_none", skip_serializing_if = "Option::is_none")]
    pub planned: Option<PlannedRecord>,
    /// Fallback due date.
    #[serde(default, deserialize_with = "lenient::present", skip_serializing_if = "Option::is_none")]
    pub ultimate_date: Option<Value>,
    /// Unmodelled task fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Planning details of a task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedRecord {
    /// Planned execution date.
    #[serde(default, deserialize_with = "lenient::present", skip_serializing_if = "Option::is_none")]
    pub work_date: Option<Value>,
    /// Invoiced price, authoritative when present.
    #[serde(default, deserialize_with = "lenient::present", skip_serializing_if = "Option::is_none")]
    pub invoice_price: Option<Value>,
    /// Offered price.
    #[serde(default, deserialize_with = "lenient::present", skip_serializing_if = "Option::is_none")]
    pub offer_price: Option<Value>,
    /// Estimated price.
    #[serde(default, deserialize_with = "lenient::present", skip_serializing_if = "Option::is_none")]
    pub estimated_price: Option<Value>,
    /// Unmodelled planning fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A stored offer group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferGroupRecord {
    /// Group identifier referenced by `TaskRecord::offer_group_id`.
    #[serde(default)]
    pub offer_group_id: OfferGroupId,
    /// Display name.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Work date overriding the member dates for display.
    #[serde(default, deserialize_with = "lenient::present", skip_serializing_if = "Option::is_none")]
    pub group_work_date: Option<Value>,
    /// When set, the group total is the sum of member prices.
    #[serde(default, deserialize_with = "lenient::flag")]
    pub assign_prices_individually: bool,
    /// Single price for the whole group.
    #[serde(default, deserialize_with = "lenient::present", skip_serializing_if = "Option::is_none")]
    pub cost: Option<Value>,
    /// Unmodelled group fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Stored reserve-fund parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashInfoRecord {
    /// Balance at the reserve date.
    #[serde(default, deserialize_with = "lenient::present", skip_serializing_if = "Option::is_none")]
    pub current_cash: Option<Value>,
    /// Fixed monthly income of the fund.
    #[serde(default, deserialize_with = "lenient::present", skip_serializing_if = "Option::is_none")]
    pub monthly_contribution: Option<Value>,
    /// Epoch for contribution accrual.
    #[serde(default, deserialize_with = "lenient::present", skip_serializing_if = "Option::is_none")]
    pub reserve_date: Option<Value>,
    /// Replacement value of the property.
    #[serde(default, deserialize_with = "lenient::present", skip_serializing_if = "Option::is_none")]
    pub total_worth: Option<Value>,
    /// Unmodelled cash fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

//! Task domain - normalised task entity
//!
//! A [`Task`] is the read model the pipeline works on. It is built once from
//! a [`TaskRecord`](super::plan::TaskRecord): dates are parsed, the price
//! precedence is resolved into a [`PlannedCost`], and every problem met on
//! the way is reported as a diagnostic instead of failing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ids::{ElementId, OfferGroupId, TaskId};
use super::lenient::{self, Scalar};
use super::plan::TaskRecord;
use crate::diagnostics::{Diagnostic, Diagnostics, Subject};

/// Task urgency (1-6, higher = more urgent). Display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Urgency(u8);

impl Urgency {
    /// Least urgent level.
    pub const MIN: Self = Self(1);
    /// Most urgent level.
    pub const MAX: Self = Self(6);

    /// Creates an urgency, clamping the value into 1-6.
    #[must_use]
    pub fn new(level: i64) -> Self {
        let clamped = level.clamp(i64::from(Self::MIN.0), i64::from(Self::MAX.0));
        Self(u8::try_from(clamped).unwrap_or(Self::MIN.0))
    }

    /// Returns the inner value.
    #[must_use]
    pub const fn inner(self) -> u8 {
        self.0
    }
}

/// The single authoritative price of a task.
///
/// Precedence is invoice, then offer, then estimate. Resolved once when the
/// task is normalised.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "source", content = "amount", rename_all = "camelCase")]
pub enum PlannedCost {
    /// Invoiced amount.
    Invoice(f64),
    /// Offered amount.
    Offer(f64),
    /// Estimated amount.
    Estimate(f64),
    /// No price filled in.
    #[default]
    None,
}

impl PlannedCost {
    /// Returns the amount, 0 when no price is known.
    #[must_use]
    pub const fn amount(self) -> f64 {
        match self {
            Self::Invoice(amount) | Self::Offer(amount) | Self::Estimate(amount) => amount,
            Self::None => 0.0,
        }
    }
}

/// A normalised maintenance task.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task identifier.
    pub id: TaskId,
    /// Element the task was raised on (lookup key only).
    pub element_id: ElementId,
    /// Free-text description.
    pub description: String,
    /// Classification, if filled in.
    pub category: Option<String>,
    /// Display urgency.
    pub urgency: Option<Urgency>,
    /// Work has been inspected as done.
    pub inspection_done: bool,
    /// Offer group the task belongs to.
    pub offer_group_id: Option<OfferGroupId>,
    /// Planned execution date.
    pub work_date: Option<NaiveDate>,
    /// Fallback due date.
    pub ultimate_date: Option<NaiveDate>,
    /// Resolved price.
    pub cost: PlannedCost,
}

impl Task {
    /// Creates a bare task with no dates or price.
    #[must_use]
    pub fn new(id: impl Into<TaskId>, element_id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            element_id: element_id.into(),
            description: String::new(),
            category: None,
            urgency: None,
            inspection_done: false,
            offer_group_id: None,
            work_date: None,
            ultimate_date: None,
            cost: PlannedCost::None,
        }
    }

    /// Sets the planned work date.
    #[must_use]
    pub fn with_work_date(mut self, date: NaiveDate) -> Self {
        self.work_date = Some(date);
        self
    }

    /// Sets the fallback due date.
    #[must_use]
    pub fn with_ultimate_date(mut self, date: NaiveDate) -> Self {
        self.ultimate_date = Some(date);
        self
    }

    /// Sets the resolved price.
    #[must_use]
    pub fn with_cost(mut self, cost: PlannedCost) -> Self {
        self.cost = cost;
        self
    }

    /// Places the task in an offer group.
    #[must_use]
    pub fn in_group(mut self, group: impl Into<OfferGroupId>) -> Self {
        self.offer_group_id = Some(group.into());
        self
    }

    /// Sets the display urgency.
    #[must_use]
    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = Some(urgency);
        self
    }

    /// Marks the task as inspected done.
    #[must_use]
    pub fn done(mut self) -> Self {
        self.inspection_done = true;
        self
    }

    /// Planned work date if set, else the fallback due date.
    #[must_use]
    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.work_date.or(self.ultimate_date)
    }

    /// Resolved price, 0 when none is known.
    #[must_use]
    pub const fn effective_cost(&self) -> f64 {
        self.cost.amount()
    }

    /// Builds a task from its stored record.
    ///
    /// Malformed prices count as 0 and malformed dates as absent; each is
    /// reported to `diagnostics`.
    #[must_use]
    pub fn from_record(
        record: &TaskRecord,
        element_id: &ElementId,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        if record.id.is_empty() {
            diagnostics.push(Diagnostic::MissingTaskId {
                element_id: element_id.clone(),
            });
        }
        let subject = Subject::Task(record.id.clone());
        let planned = record.planned.as_ref();

        let work_date = read_date(
            planned.and_then(|p| p.work_date.as_ref()),
            "planned.workDate",
            &subject,
            diagnostics,
        );
        let ultimate_date = read_date(
            record.ultimate_date.as_ref(),
            "ultimateDate",
            &subject,
            diagnostics,
        );

        let cost = planned.map_or(PlannedCost::None, |p| {
            resolve_cost(
                [
                    (p.invoice_price.as_ref(), "planned.invoicePrice", PlannedCost::Invoice),
                    (p.offer_price.as_ref(), "planned.offerPrice", PlannedCost::Offer),
                    (p.estimated_price.as_ref(), "planned.estimatedPrice", PlannedCost::Estimate),
                ],
                &subject,
                diagnostics,
            )
        });

        let urgency = match lenient::integer(record.urgency.as_ref()) {
            Scalar::Valid(level) => Some(Urgency::new(level)),
            Scalar::Absent | Scalar::Malformed => None,
        };

        Self {
            id: record.id.clone(),
            element_id: element_id.clone(),
            description: record.description.clone().unwrap_or_default(),
            category: record.category.clone(),
            urgency,
            inspection_done: record.inspection_done,
            offer_group_id: record.offer_group_id.clone(),
            work_date,
            ultimate_date,
            cost,
        }
    }
}

/// Picks the first non-empty price in precedence order.
fn resolve_cost(
    candidates: [(Option<&Value>, &'static str, fn(f64) -> PlannedCost); 3],
    subject: &Subject,
    diagnostics: &mut Diagnostics,
) -> PlannedCost {
    for (value, field, source) in candidates {
        match lenient::amount(value) {
            Scalar::Absent => {}
            Scalar::Valid(amount) => return source(amount),
            Scalar::Malformed => {
                diagnostics.push(Diagnostic::MalformedNumber {
                    subject: subject.clone(),
                    field,
                    value: lenient::describe(value),
                });
                return source(0.0);
            }
        }
    }
    PlannedCost::None
}

pub(crate) fn read_date(
    value: Option<&Value>,
    field: &'static str,
    subject: &Subject,
    diagnostics: &mut Diagnostics,
) -> Option<NaiveDate> {
    match lenient::date(value) {
        Scalar::Valid(date) => Some(date),
        Scalar::Absent => None,
        Scalar::Malformed => {
            diagnostics.push(Diagnostic::MalformedDate {
                subject: subject.clone(),
                field,
                value: lenient::describe(value),
            });
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use serde_json::json;

    fn record(value: Value) -> TaskRecord {
        serde_json::from_value(value).unwrap()
    }

    fn normalise(value: Value) -> (Task, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let task = Task::from_record(&record(value), &ElementId::new("e1"), &mut diagnostics);
        (task, diagnostics)
    }

    #[test]
    fn invoice_beats_offer_beats_estimate() {
        let (task, _) = normalise(json!({
            "id": "t1",
            "planned": {"invoicePrice": 120, "offerPrice": 100, "estimatedPrice": 90}
        }));
        assert_eq!(task.cost, PlannedCost::Invoice(120.0));

        let (task, _) = normalise(json!({
            "id": "t2",
            "planned": {"invoicePrice": "", "offerPrice": null, "estimatedPrice": "90"}
        }));
        assert_eq!(task.cost, PlannedCost::Estimate(90.0));
    }

    #[test]
    fn missing_prices_cost_nothing() {
        let (task, diagnostics) = normalise(json!({"id": "t1"}));
        assert_eq!(task.cost, PlannedCost::None);
        assert!(task.effective_cost().abs() < f64::EPSILON);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn malformed_price_counts_as_zero_and_is_reported() {
        let (task, diagnostics) = normalise(json!({
            "id": "t1",
            "planned": {"invoicePrice": "pending", "offerPrice": 400}
        }));
        assert_eq!(task.cost, PlannedCost::Invoice(0.0));
        assert_eq!(diagnostics.count(DiagnosticKind::MalformedNumber), 1);
    }

    #[test]
    fn work_date_wins_over_ultimate_date() {
        let (task, _) = normalise(json!({
            "id": "t1",
            "planned": {"workDate": "2026-05-01"},
            "ultimateDate": "2030-01-01"
        }));
        assert_eq!(task.effective_date(), NaiveDate::from_ymd_opt(2026, 5, 1));

        let (task, _) = normalise(json!({"id": "t2", "ultimateDate": "2030-01-01"}));
        assert_eq!(task.effective_date(), NaiveDate::from_ymd_opt(2030, 1, 1));
    }

    #[test]
    fn unreadable_work_date_falls_back_and_is_reported() {
        let (task, diagnostics) = normalise(json!({
            "id": "t1",
            "planned": {"workDate": "soon"},
            "ultimateDate": "2030-01-01"
        }));
        assert_eq!(task.effective_date(), NaiveDate::from_ymd_opt(2030, 1, 1));
        assert_eq!(diagnostics.count(DiagnosticKind::MalformedDate), 1);
    }

    #[test]
    fn task_without_id_is_reported_with_its_element() {
        let (task, diagnostics) = normalise(json!({"planned": {"offerPrice": 400}}));
        assert!(task.id.is_empty());
        assert_eq!(
            diagnostics.iter().collect::<Vec<_>>(),
            vec![&Diagnostic::MissingTaskId {
                element_id: ElementId::new("e1")
            }]
        );
    }

    #[test]
    fn urgency_is_clamped() {
        let (task, _) = normalise(json!({"id": "t1", "urgency": "9"}));
        assert_eq!(task.urgency, Some(Urgency::MAX));
        let (task, _) = normalise(json!({"id": "t2", "urgency": 0}));
        assert_eq!(task.urgency, Some(Urgency::MIN));
        let (task, _) = normalise(json!({"id": "t3", "urgency": "high"}));
        assert_eq!(task.urgency, None);
    }
}

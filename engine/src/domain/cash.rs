//! Reserve-fund parameters.

use chrono::NaiveDate;
use serde::Serialize;

use super::lenient::{self, Scalar};
use super::plan::CashInfoRecord;
use super::task::read_date;
use crate::diagnostics::{Diagnostic, Diagnostics, Subject};

/// Normalised reserve-fund parameters of one plan.
///
/// Read-only for the projection; only explicit user edits change the stored
/// record it is built from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashInfo {
    /// Balance at the reserve date.
    pub current_cash: f64,
    /// Fixed monthly income of the fund.
    pub monthly_contribution: f64,
    /// Epoch for contribution accrual. `None` accrues nothing.
    pub reserve_date: Option<NaiveDate>,
    /// Replacement value of the property.
    pub total_worth: f64,
}

impl CashInfo {
    /// Creates cash parameters from already-validated values.
    #[must_use]
    pub const fn new(
        current_cash: f64,
        monthly_contribution: f64,
        reserve_date: NaiveDate,
        total_worth: f64,
    ) -> Self {
        Self {
            current_cash,
            monthly_contribution,
            reserve_date: Some(reserve_date),
            total_worth,
        }
    }

    /// Builds cash parameters from the stored record.
    ///
    /// Unreadable amounts count as 0. A missing or unreadable reserve date
    /// is reported and leaves `reserve_date` unset.
    #[must_use]
    pub fn from_record(record: &CashInfoRecord, diagnostics: &mut Diagnostics) -> Self {
        let subject = Subject::CashInfo;
        let mut money = |value: Option<&serde_json::Value>, field: &'static str| {
            match lenient::amount(value) {
                Scalar::Valid(amount) => amount,
                Scalar::Absent => 0.0,
                Scalar::Malformed => {
                    diagnostics.push(Diagnostic::MalformedNumber {
                        subject: subject.clone(),
                        field,
                        value: lenient::describe(value),
                    });
                    0.0
                }
            }
        };

        let current_cash = money(record.current_cash.as_ref(), "currentCash");
        let monthly_contribution =
            money(record.monthly_contribution.as_ref(), "monthlyContribution");
        let total_worth = money(record.total_worth.as_ref(), "totalWorth");

        let reserve_date = read_date(
            record.reserve_date.as_ref(),
            "reserveDate",
            &subject,
            diagnostics,
        );
        if reserve_date.is_none() {
            diagnostics.push(Diagnostic::MissingReserveDate);
        }

        Self {
            current_cash,
            monthly_contribution,
            reserve_date,
            total_worth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use serde_json::json;

    #[test]
    fn reads_string_and_number_amounts() {
        let record: CashInfoRecord = serde_json::from_value(json!({
            "currentCash": "1000",
            "monthlyContribution": 100,
            "reserveDate": "2024-01-01",
            "totalWorth": "100000.50"
        }))
        .unwrap();
        let mut diagnostics = Diagnostics::new();
        let cash = CashInfo::from_record(&record, &mut diagnostics);

        assert!((cash.current_cash - 1000.0).abs() < f64::EPSILON);
        assert!((cash.monthly_contribution - 100.0).abs() < f64::EPSILON);
        assert!((cash.total_worth - 100_000.5).abs() < f64::EPSILON);
        assert_eq!(cash.reserve_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn malformed_fields_degrade_and_are_reported() {
        let record: CashInfoRecord = serde_json::from_value(json!({
            "currentCash": "lots",
            "monthlyContribution": 100,
            "reserveDate": "someday"
        }))
        .unwrap();
        let mut diagnostics = Diagnostics::new();
        let cash = CashInfo::from_record(&record, &mut diagnostics);

        assert!(cash.current_cash.abs() < f64::EPSILON);
        assert!(cash.total_worth.abs() < f64::EPSILON);
        assert!(cash.reserve_date.is_none());
        assert_eq!(diagnostics.count(DiagnosticKind::MalformedNumber), 1);
        assert_eq!(diagnostics.count(DiagnosticKind::MalformedDate), 1);
        assert_eq!(diagnostics.count(DiagnosticKind::MissingReserveDate), 1);
    }
}

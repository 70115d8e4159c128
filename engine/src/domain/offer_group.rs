//! Offer groups - tasks priced and scheduled as one bundle.

use chrono::NaiveDate;
use serde::Serialize;

use super::ids::OfferGroupId;
use super::lenient::{self, Scalar};
use super::plan::OfferGroupRecord;
use super::task::read_date;
use crate::diagnostics::{Diagnostic, Diagnostics, Subject};

/// Display name given to a group synthesized for a dangling reference.
pub const PLACEHOLDER_GROUP_NAME: &str = "Unknown offer group";

/// A normalised offer group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferGroup {
    /// Group identifier.
    pub offer_group_id: OfferGroupId,
    /// Display name.
    pub name: String,
    /// Work date overriding the member dates for display.
    pub group_work_date: Option<NaiveDate>,
    /// Group total is the sum of member prices instead of `cost`.
    pub assign_prices_individually: bool,
    /// Single price for the whole group.
    pub cost: f64,
}

impl OfferGroup {
    /// Creates a group that sums its member prices.
    #[must_use]
    pub fn individually_priced(id: impl Into<OfferGroupId>, name: impl Into<String>) -> Self {
        Self {
            offer_group_id: id.into(),
            name: name.into(),
            group_work_date: None,
            assign_prices_individually: true,
            cost: 0.0,
        }
    }

    /// Creates a group with one price for all members.
    #[must_use]
    pub fn fixed_price(id: impl Into<OfferGroupId>, name: impl Into<String>, cost: f64) -> Self {
        Self {
            assign_prices_individually: false,
            cost,
            ..Self::individually_priced(id, name)
        }
    }

    /// Stand-in for a group id that no longer resolves.
    ///
    /// Member prices are summed since there is no group price to use.
    #[must_use]
    pub fn placeholder(id: OfferGroupId) -> Self {
        Self::individually_priced(id, PLACEHOLDER_GROUP_NAME)
    }

    /// Sets the display work date.
    #[must_use]
    pub fn with_work_date(mut self, date: NaiveDate) -> Self {
        self.group_work_date = Some(date);
        self
    }

    /// Builds a group from its stored record.
    #[must_use]
    pub fn from_record(record: &OfferGroupRecord, diagnostics: &mut Diagnostics) -> Self {
        let subject = Subject::OfferGroup(record.offer_group_id.clone());
        let cost = match lenient::amount(record.cost.as_ref()) {
            Scalar::Valid(amount) => amount,
            Scalar::Absent => 0.0,
            Scalar::Malformed => {
                diagnostics.push(Diagnostic::MalformedNumber {
                    subject: subject.clone(),
                    field: "cost",
                    value: lenient::describe(record.cost.as_ref()),
                });
                0.0
            }
        };

        Self {
            offer_group_id: record.offer_group_id.clone(),
            name: record.name.clone().unwrap_or_default(),
            group_work_date: read_date(
                record.group_work_date.as_ref(),
                "groupWorkDate",
                &subject,
                diagnostics,
            ),
            assign_prices_individually: record.assign_prices_individually,
            cost,
        }
    }
}

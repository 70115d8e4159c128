//! Domain Layer - Stored records and normalised entities
//!
//! The domain module is organized into submodules:
//! - `ids`: Strongly-typed identifiers (`PlanId`, `ElementId`, `TaskId`, `OfferGroupId`)
//! - `plan`: Stored plan records, kept close to the wire format
//! - `records`: Stored lists that keep items they cannot read
//! - `lenient`: Tolerant decoding of user-entered values
//! - `task`, `cash`, `offer_group`: Normalised entities the pipeline works on

pub use cash::CashInfo;
pub use ids::{ElementId, OfferGroupId, PlanId, TaskId};
pub use offer_group::{OfferGroup, PLACEHOLDER_GROUP_NAME};
pub use plan::{
    CashInfoRecord, Element, InspectionReport, OfferGroupRecord, Plan, PlannedRecord, TaskRecord,
};
pub use records::Records;
pub use task::{PlannedCost, Task, Urgency};

mod cash;
mod ids;
pub mod lenient;
mod offer_group;
mod plan;
mod records;
mod task;

//! MJOP financing engine
//!
//! The engine turns one building's maintenance plan (MJOP) into the view
//! models the planning screens render:
//! 1. Flattens element → inspection report → task into a task list
//! 2. Projects the reserve-fund balance over the time-ordered tasks
//! 3. Groups tasks into offer groups and standalone tasks
//! 4. Buckets groups and tasks by calendar year
//! 5. Classifies every projected balance into a solvency tier
//!
//! Every stage is a pure function over an immutable snapshot of the plan.
//! Edits go through [`state::dispatch`], which returns a new plan; the
//! pipeline is then re-run from scratch on the new snapshot.

pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod extraction;
pub mod grouping;
pub mod pipeline;
pub mod projection;
pub mod repository;
pub mod solvency;
pub mod state;
pub mod timeline;

pub use config::EngineConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Subject};
pub use error::{EngineError, RepositoryError, StateError};
pub use extraction::{Extraction, extract_tasks};
pub use grouping::{GroupView, GroupedView, TaskView, group};
pub use pipeline::{ClassifiedPoint, PlanReport, Summary, TierCounts, analyze};
pub use projection::{Projection, ProjectionPoint, project};
pub use repository::{InMemoryPlanRepository, PlanRepository};
pub use solvency::{MINIMUM_RESERVE_RATIO, Tier, classify, classify_with};
pub use state::{Action, dispatch};
pub use timeline::{TimelineEntry, TimelineOptions, YearBucket, by_year};

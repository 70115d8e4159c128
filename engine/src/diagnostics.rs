//! Non-fatal findings collected while running the pipeline.
//!
//! Problems in stored data never stop a projection. Each stage absorbs them
//! with a best-effort default and records a [`Diagnostic`] so callers can
//! show or assert on what was degraded.

use core::fmt;
use serde::Serialize;
use tracing::warn;

use crate::domain::{ElementId, OfferGroupId, TaskId};

/// The record a diagnostic is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "camelCase")]
pub enum Subject {
    /// A task.
    Task(TaskId),
    /// An offer group.
    OfferGroup(OfferGroupId),
    /// The plan's cash info.
    CashInfo,
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task(id) => write!(f, "task '{id}'"),
            Self::OfferGroup(id) => write!(f, "offer group '{id}'"),
            Self::CashInfo => write!(f, "cash info"),
        }
    }
}

/// A single non-fatal finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Diagnostic {
    /// Task has neither a work date nor an ultimate date; left out of the
    /// projection.
    MissingDate {
        /// The undated task.
        task_id: TaskId,
    },
    /// A date field could not be read and was treated as absent.
    MalformedDate {
        /// Record holding the field.
        subject: Subject,
        /// Wire name of the field.
        field: &'static str,
        /// Raw stored value.
        value: String,
    },
    /// A monetary field could not be read and was treated as 0.
    MalformedNumber {
        /// Record holding the field.
        subject: Subject,
        /// Wire name of the field.
        field: &'static str,
        /// Raw stored value.
        value: String,
    },
    /// Task points at an offer group that does not exist.
    DanglingGroup {
        /// The referring task.
        task_id: TaskId,
        /// The missing group.
        offer_group_id: OfferGroupId,
    },
    /// Two tasks share an id; balance lookups resolve to the later one.
    DuplicateTaskId {
        /// The shared id.
        task_id: TaskId,
    },
    /// Cash info has no readable reserve date; contributions accrue nothing.
    MissingReserveDate,
    /// Task has no id; it is projected but has no balance lookup.
    MissingTaskId {
        /// Element the task was found under.
        element_id: ElementId,
    },
    /// A stored list item is not a record. It stays in the plan and is left
    /// out of the analysis.
    UnreadableRecord {
        /// Wire name of the list.
        list: &'static str,
        /// Raw stored item.
        value: String,
    },
}

/// Discriminant of [`Diagnostic`], for counting and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// See [`Diagnostic::MissingDate`].
    MissingDate,
    /// See [`Diagnostic::MalformedDate`].
    MalformedDate,
    /// See [`Diagnostic::MalformedNumber`].
    MalformedNumber,
    /// See [`Diagnostic::DanglingGroup`].
    DanglingGroup,
    /// See [`Diagnostic::DuplicateTaskId`].
    DuplicateTaskId,
    /// See [`Diagnostic::MissingReserveDate`].
    MissingReserveDate,
    /// See [`Diagnostic::MissingTaskId`].
    MissingTaskId,
    /// See [`Diagnostic::UnreadableRecord`].
    UnreadableRecord,
}

impl Diagnostic {
    /// Returns the kind of this diagnostic.
    #[must_use]
    pub const fn kind(&self) -> DiagnosticKind {
        match self {
            Self::MissingDate { .. } => DiagnosticKind::MissingDate,
            Self::MalformedDate { .. } => DiagnosticKind::MalformedDate,
            Self::MalformedNumber { .. } => DiagnosticKind::MalformedNumber,
            Self::DanglingGroup { .. } => DiagnosticKind::DanglingGroup,
            Self::DuplicateTaskId { .. } => DiagnosticKind::DuplicateTaskId,
            Self::MissingReserveDate => DiagnosticKind::MissingReserveDate,
            Self::MissingTaskId { .. } => DiagnosticKind::MissingTaskId,
            Self::UnreadableRecord { .. } => DiagnosticKind::UnreadableRecord,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDate { task_id } => write!(
                f,
                "Task '{task_id}' has no work date or ultimate date and was left out of the projection"
            ),
            Self::MalformedDate {
                subject,
                field,
                value,
            } => write!(f, "Unreadable date in {subject}.{field}: '{value}'"),
            Self::MalformedNumber {
                subject,
                field,
                value,
            } => write!(f, "Unreadable amount in {subject}.{field}: '{value}', using 0"),
            Self::DanglingGroup {
                task_id,
                offer_group_id,
            } => write!(
                f,
                "Task '{task_id}' refers to missing offer group '{offer_group_id}'"
            ),
            Self::DuplicateTaskId { task_id } => write!(f, "Task id '{task_id}' is used twice"),
            Self::MissingReserveDate => {
                write!(f, "Cash info has no reserve date, contributions not accrued")
            }
            Self::MissingTaskId { element_id } => {
                write!(f, "A task of element '{element_id}' has no id")
            }
            Self::UnreadableRecord { list, value } => {
                write!(f, "Unreadable entry in {list} kept as stored: {value}")
            }
        }
    }
}

/// Ordered list of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Records a diagnostic and emits it as a warning event.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        warn!(kind = ?diagnostic.kind(), "{diagnostic}");
        self.0.push(diagnostic);
    }

    /// Appends all diagnostics from `other` without re-emitting them.
    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// Number of diagnostics of the given kind.
    #[must_use]
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.0.iter().filter(|d| d.kind() == kind).count()
    }

    /// Total number of diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = core::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

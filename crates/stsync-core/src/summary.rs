//! Per-record outcomes and the end-of-run summary.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::kinds::EntityKind;

/// Why a record was not created. Skips are expected outcomes, never errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The crosswalk already maps this record.
    AlreadyMapped { target_id: String },
    /// A required foreign key has no crosswalk entry yet.
    MissingDependency { kind: EntityKind, source_id: String },
    /// The source document failed validation.
    Invalid { detail: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyMapped { target_id } => write!(f, "already mapped to {target_id}"),
            Self::MissingDependency { kind, source_id } => {
                write!(f, "missing dependency: {kind}/{source_id}")
            }
            Self::Invalid { detail } => write!(f, "invalid data: {detail}"),
        }
    }
}

/// What happened to one listed record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecordOutcome {
    Created {
        source_id: String,
        target_id: String,
    },
    /// Dry-run only: the payload that would have been posted.
    WouldCreate {
        source_id: String,
        payload: serde_json::Value,
    },
    Skipped {
        source_id: Option<String>,
        reason: SkipReason,
    },
    Failed {
        source_id: String,
        error: String,
    },
}

/// Counts reported at the end of `sync <kind>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SyncSummary {
    pub kind: Option<EntityKind>,
    pub dry_run: bool,
    pub listed: u64,
    pub created: u64,
    pub would_create: u64,
    pub skipped_existing: u64,
    pub skipped_missing_dependency: u64,
    pub skipped_invalid: u64,
    pub failed: u64,
}

impl SyncSummary {
    #[must_use]
    pub fn new(kind: EntityKind, dry_run: bool) -> Self {
        Self {
            kind: Some(kind),
            dry_run,
            ..Self::default()
        }
    }

    /// Count one record outcome.
    pub fn record(&mut self, outcome: &RecordOutcome) {
        self.listed += 1;
        match outcome {
            RecordOutcome::Created { .. } => self.created += 1,
            RecordOutcome::WouldCreate { .. } => self.would_create += 1,
            RecordOutcome::Skipped { reason, .. } => match reason {
                SkipReason::AlreadyMapped { .. } => self.skipped_existing += 1,
                SkipReason::MissingDependency { .. } => self.skipped_missing_dependency += 1,
                SkipReason::Invalid { .. } => self.skipped_invalid += 1,
            },
            RecordOutcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Total records skipped for any reason.
    #[must_use]
    pub const fn skipped(&self) -> u64 {
        self.skipped_existing + self.skipped_missing_dependency + self.skipped_invalid
    }
}

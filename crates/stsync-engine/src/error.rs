//! Errors that abort a sync run.
//!
//! Per-record problems are values (`SkipReason`, `RecordOutcome::Failed`),
//! never `SyncError`.

use std::fmt;

use stsync_core::EntityKind;
use stsync_db::DatabaseError;
use stsync_http::TransportError;
use thiserror::Error;

/// Step of the per-kind state machine where a run aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Setup,
    Fetching,
    Listing,
    CheckMapped,
    Mapping,
    Creating,
    Recording,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Setup => "setup",
            Self::Fetching => "fetching",
            Self::Listing => "listing",
            Self::CheckMapped => "checking crosswalk for",
            Self::Mapping => "mapping",
            Self::Creating => "creating",
            Self::Recording => "recording",
        })
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("{kind} cannot be synced; only items, pos and jobs can")]
    NotSyncable { kind: EntityKind },

    #[error("no entity descriptor for {kind}")]
    NotConfigured { kind: EntityKind },

    #[error("{kind} has no create path configured")]
    NotCreatable { kind: EntityKind },

    #[error("{phase} {kind} failed: {source}")]
    Transport {
        kind: EntityKind,
        phase: SyncPhase,
        #[source]
        source: TransportError,
    },

    #[error("listing {kind} failed: malformed page: {detail}")]
    MalformedPage { kind: EntityKind, detail: String },

    #[error("{phase} {kind} failed: crosswalk store error: {source}")]
    Store {
        kind: EntityKind,
        phase: SyncPhase,
        #[source]
        source: DatabaseError,
    },
}

impl SyncError {
    /// Phase the run was in when it aborted.
    #[must_use]
    pub const fn phase(&self) -> SyncPhase {
        match self {
            Self::NotSyncable { .. } | Self::NotConfigured { .. } | Self::NotCreatable { .. } => {
                SyncPhase::Setup
            }
            Self::MalformedPage { .. } => SyncPhase::Listing,
            Self::Transport { phase, .. } | Self::Store { phase, .. } => *phase,
        }
    }

    pub(crate) fn store(kind: EntityKind, phase: SyncPhase) -> impl Fn(DatabaseError) -> Self {
        move |source| Self::Store {
            kind,
            phase,
            source,
        }
    }
}

//! Entity kinds known to the crosswalk.
//!
//! Three kinds are synchronized directly (`items`, `pos`, `jobs`); the rest are
//! reference kinds that only ever appear as foreign-key targets and are seeded
//! into the crosswalk by the operator.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// Symbolic category of an entity in the crosswalk.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Items,
    Pos,
    Jobs,
    Vendors,
    Warehouses,
    Customers,
    Locations,
    JobTypes,
    Campaigns,
}

impl EntityKind {
    /// Every kind, synchronized kinds first in dependency order.
    pub const ALL: [Self; 9] = [
        Self::Items,
        Self::Pos,
        Self::Jobs,
        Self::Vendors,
        Self::Warehouses,
        Self::Customers,
        Self::Locations,
        Self::JobTypes,
        Self::Campaigns,
    ];

    /// Return the string representation used in SQL storage and config keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Items => "items",
            Self::Pos => "pos",
            Self::Jobs => "jobs",
            Self::Vendors => "vendors",
            Self::Warehouses => "warehouses",
            Self::Customers => "customers",
            Self::Locations => "locations",
            Self::JobTypes => "jobTypes",
            Self::Campaigns => "campaigns",
        }
    }

    /// Whether the engine can list and create records of this kind.
    #[must_use]
    pub const fn is_syncable(self) -> bool {
        matches!(self, Self::Items | Self::Pos | Self::Jobs)
    }

    /// Kinds whose crosswalk entries the mapper reads when mapping this kind.
    ///
    /// ```text
    /// items → (none)
    /// pos   → items, vendors, warehouses
    /// jobs  → customers, locations, jobTypes, campaigns
    /// ```
    #[must_use]
    pub const fn dependencies(self) -> &'static [Self] {
        match self {
            Self::Pos => &[Self::Items, Self::Vendors, Self::Warehouses],
            Self::Jobs => &[
                Self::Customers,
                Self::Locations,
                Self::JobTypes,
                Self::Campaigns,
            ],
            _ => &[],
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoreError::UnknownKind(s.to_string()))
    }
}

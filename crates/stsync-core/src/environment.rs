//! The two API environments stsync talks to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source (`Prod`) or target (`Int`) side of a migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Prod,
    Int,
}

impl Environment {
    /// Configuration section name (`prod` / `int`).
    #[must_use]
    pub const fn section(self) -> &'static str {
        match self {
            Self::Prod => "prod",
            Self::Int => "int",
        }
    }

    /// Suffix of the flat environment variable names (`ST_CLIENT_ID_PROD`).
    #[must_use]
    pub const fn env_suffix(self) -> &'static str {
        match self {
            Self::Prod => "PROD",
            Self::Int => "INT",
        }
    }

    /// Human-readable label for messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Prod => "Production",
            Self::Int => "Integration",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

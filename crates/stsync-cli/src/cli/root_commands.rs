use clap::{Args, Subcommand, ValueEnum};
use stsync_core::EntityKind;

use crate::cli::subcommands::CrosswalkCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Copy one kind from production into integration.
    Sync(SyncArgs),
    /// Copy a single production purchase order by id.
    CopyPo(CopyPoArgs),
    /// Check settings, the entity file, both tokens, and one production list call.
    Verify,
    /// Inspect or seed the crosswalk.
    Crosswalk {
        #[command(subcommand)]
        action: CrosswalkCommands,
    },
    /// Dump a registered JSON Schema, or list the names.
    Schema(SchemaArgs),
}

/// Kinds `sync` accepts.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SyncKind {
    Items,
    Pos,
    Jobs,
}

impl From<SyncKind> for EntityKind {
    fn from(kind: SyncKind) -> Self {
        match kind {
            SyncKind::Items => Self::Items,
            SyncKind::Pos => Self::Pos,
            SyncKind::Jobs => Self::Jobs,
        }
    }
}

/// Arguments for `stsync sync`.
#[derive(Clone, Debug, Args)]
pub struct SyncArgs {
    pub kind: SyncKind,
    /// Only list records changed on or after this date (endpoint-specific format).
    #[arg(long)]
    pub since: Option<String>,
    /// Stop after listing this many records.
    #[arg(long)]
    pub limit: Option<u64>,
    /// Map and print payloads without creating anything or writing the crosswalk.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for `stsync copy-po`.
#[derive(Clone, Debug, Args)]
pub struct CopyPoArgs {
    /// Production purchase-order id.
    #[arg(long = "id", value_name = "ID")]
    pub id: String,
    /// Integration warehouse to receive into when the PO's warehouse is not mapped.
    #[arg(long)]
    pub default_warehouse_id: Option<String>,
    /// Map and print the payload without creating anything or writing the crosswalk.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for `stsync schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Schema name; omit to list every registered name.
    pub name: Option<String>,
}

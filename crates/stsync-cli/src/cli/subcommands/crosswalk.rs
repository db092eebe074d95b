use clap::Subcommand;
use stsync_core::EntityKind;

/// Crosswalk inspection and operator seeding.
#[derive(Clone, Debug, Subcommand)]
pub enum CrosswalkCommands {
    /// Show the target id a source record maps to.
    Get { kind: EntityKind, source_id: String },
    /// Record a mapping by hand (reference kinds such as vendors or customers).
    /// An existing mapping is left unchanged.
    Put {
        kind: EntityKind,
        source_id: String,
        target_id: String,
    },
    /// List mappings, oldest first.
    List {
        /// Restrict to one kind.
        #[arg(long)]
        kind: Option<EntityKind>,
        /// Maximum rows to show.
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },
}

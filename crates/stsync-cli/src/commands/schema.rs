use anyhow::anyhow;
use stsync_schema::SchemaRegistry;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Handle `stsync schema [name]`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let registry = SchemaRegistry::new();
    match args.name.as_deref() {
        None => output(&registry.list(), flags.format),
        Some(name) => {
            let schema = registry.get(name).ok_or_else(|| {
                anyhow!(
                    "unknown schema '{name}'; available: {}",
                    registry.list().join(", ")
                )
            })?;
            // Schemas are always JSON; text tables would flatten them.
            let format = match flags.format {
                OutputFormat::Raw => OutputFormat::Raw,
                OutputFormat::Json | OutputFormat::Text => OutputFormat::Json,
            };
            output(schema, format)
        }
    }
}

use anyhow::bail;
use chrono::Utc;
use serde::Serialize;
use stsync_core::EntityKind;
use stsync_db::InsertOutcome;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CrosswalkCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct PutResponse<'a> {
    kind: EntityKind,
    source_id: &'a str,
    target_id: String,
    inserted: bool,
}

/// Handle `stsync crosswalk`.
pub async fn handle(
    action: &CrosswalkCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let store = ctx.open_store().await?;
    match action {
        CrosswalkCommands::Get { kind, source_id } => {
            let Some(entry) = store.get_entry(*kind, source_id).await? else {
                bail!("no crosswalk entry for {kind}/{source_id}");
            };
            output(&entry, flags.format)
        }
        CrosswalkCommands::Put {
            kind,
            source_id,
            target_id,
        } => {
            let outcome = store.insert(*kind, source_id, target_id, Utc::now()).await?;
            let target_id = match outcome {
                InsertOutcome::Inserted => target_id.clone(),
                InsertOutcome::AlreadyExists => {
                    let existing = store.lookup(*kind, source_id).await?.unwrap_or_default();
                    if existing != *target_id {
                        tracing::warn!(
                            kind = %kind,
                            source_id,
                            existing,
                            requested = target_id,
                            "crosswalk already maps this record; left unchanged"
                        );
                    }
                    existing
                }
            };
            output(
                &PutResponse {
                    kind: *kind,
                    source_id,
                    target_id,
                    inserted: outcome == InsertOutcome::Inserted,
                },
                flags.format,
            )
        }
        CrosswalkCommands::List { kind, limit } => {
            let entries = store.list(*kind, *limit).await?;
            output(&entries, flags.format)
        }
    }
}

use serde::Serialize;
use stsync_core::{EntityKind, RecordOutcome};
use stsync_engine::SyncOptions;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CopyPoArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

#[derive(Serialize)]
struct CopyReport {
    kind: EntityKind,
    dry_run: bool,
    #[serde(flatten)]
    outcome: RecordOutcome,
}

/// Handle `stsync copy-po --id <ID>`.
pub async fn handle(
    args: &CopyPoArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let kind = EntityKind::Pos;
    let options = SyncOptions {
        since: None,
        limit: 1,
        dry_run: args.dry_run,
        record_delay: std::time::Duration::ZERO,
    };

    let mut defaults = ctx.mapper_defaults();
    if let Some(warehouse) = &args.default_warehouse_id {
        defaults.warehouse_id = Some(warehouse.clone());
    }
    let sync = ctx.sync_context_with(defaults).await?;

    let progress = Progress::spinner(&format!("copying purchase order {}", args.id));
    let outcome = match sync.copy_record(kind, &args.id, &options, &mut ()).await {
        Ok(outcome) => outcome,
        Err(error) => {
            tracing::error!(kind = %kind, source_id = %args.id, phase = %error.phase(), %error, "copy aborted");
            progress.finish_err(&format!("purchase order {}: aborted", args.id));
            return Err(error.into());
        }
    };

    let failed = matches!(outcome, RecordOutcome::Failed { .. });
    if failed {
        progress.finish_err(&format!("purchase order {}: failed", args.id));
    } else {
        progress.finish_ok(&format!("purchase order {}: done", args.id));
    }

    let report = CopyReport {
        kind,
        dry_run: options.dry_run,
        outcome,
    };
    output(&report, flags.format)?;

    if failed {
        anyhow::bail!("purchase order {} was not copied", args.id);
    }
    Ok(())
}

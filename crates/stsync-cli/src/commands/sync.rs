use serde::Serialize;
use serde_json::Value;
use stsync_core::{EntityKind, SyncSummary};
use stsync_engine::SyncOptions;

use crate::cli::root_commands::SyncArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::output;
use crate::progress::SyncProgress;

#[derive(Serialize)]
struct SyncReport {
    #[serde(flatten)]
    summary: SyncSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    payloads: Vec<Value>,
}

/// Handle `stsync sync <kind>`.
pub async fn handle(args: &SyncArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let kind = EntityKind::from(args.kind);
    let options = SyncOptions {
        since: args.since.clone(),
        limit: args.limit.unwrap_or(0),
        dry_run: args.dry_run,
        record_delay: ctx.record_delay(),
    };

    let sync = ctx.sync_context().await?;

    let echo_payloads = flags.format == OutputFormat::Text;
    let mut progress = SyncProgress::new(kind, options.dry_run, echo_payloads);
    let result = sync.sync_kind(kind, &options, &mut progress).await;

    let summary = match result {
        Ok(summary) => summary,
        Err(error) => {
            tracing::error!(kind = %kind, phase = %error.phase(), %error, "sync aborted");
            progress.progress().finish_err(&format!("{kind}: aborted"));
            return Err(error.into());
        }
    };

    progress.progress().finish_ok(&format!(
        "{kind}: {} listed, done",
        summary.listed
    ));

    let report = SyncReport {
        summary,
        payloads: progress.take_payloads(),
    };
    output(&report, flags.format)
}

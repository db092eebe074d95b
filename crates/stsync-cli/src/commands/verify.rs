use serde::Serialize;
use serde_json::Value;
use stsync_core::{EntityKind, Environment};

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct VerifyReport {
    configured_kinds: Vec<EntityKind>,
    prod_token: &'static str,
    int_token: &'static str,
    checked_kind: Option<EntityKind>,
    checked_records: Option<usize>,
}

/// Handle `stsync verify`.
///
/// Fails on the first problem: missing settings, an unreadable entity file,
/// a rejected token request, or a failing production list call.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.config.require_environments()?;
    let entities = ctx.load_entities()?;
    let descriptors = ctx.descriptors(&entities)?;

    let progress = Progress::spinner("requesting production token");
    let source = ctx.api_client(Environment::Prod).await?;
    progress.set_message("requesting integration token");
    ctx.api_client(Environment::Int).await?;

    let mut report = VerifyReport {
        configured_kinds: descriptors.iter().map(|d| d.kind).collect(),
        prod_token: "ok",
        int_token: "ok",
        checked_kind: None,
        checked_records: None,
    };

    if let Some(descriptor) = descriptors.first() {
        progress.set_message(&format!("listing one {} record", descriptor.kind));
        let query = vec![
            ("page".to_string(), "1".to_string()),
            ("pageSize".to_string(), "1".to_string()),
        ];
        let body = source.get_json(&descriptor.list_path, &query).await?;
        report.checked_kind = Some(descriptor.kind);
        report.checked_records = Some(
            body.get(&descriptor.data_key)
                .and_then(Value::as_array)
                .map_or(0, Vec::len),
        );
    } else {
        tracing::warn!("entity file configures no syncable kind; skipped list check");
    }

    progress.finish_ok("verified");
    output(&report, flags.format)
}

use indicatif::{ProgressBar, ProgressStyle};
use stsync_core::{EntityKind, RecordOutcome, SyncSummary};
use stsync_engine::SyncObserver;

use crate::ui;

/// Spinner on stderr, hidden when output is not a terminal.
pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    #[must_use]
    pub fn spinner(message: &str) -> Self {
        if !ui::prefs().progress {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    /// Print a line without tearing the spinner; plain stdout when hidden.
    pub fn println(&self, line: &str) {
        match &self.bar {
            Some(bar) => bar.println(line),
            None => println!("{line}"),
        }
    }

    pub fn finish_ok(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(message.to_string());
        }
    }

    pub fn finish_err(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.abandon_with_message(message.to_string());
        }
    }
}

/// Keeps a running tally on the spinner while a sync runs.
pub struct SyncProgress {
    progress: Progress,
    tally: SyncSummary,
    echo_payloads: bool,
    payloads: Vec<serde_json::Value>,
}

impl SyncProgress {
    /// `echo_payloads` prints each dry-run payload as it is mapped instead of
    /// collecting it for the final report.
    #[must_use]
    pub fn new(kind: EntityKind, dry_run: bool, echo_payloads: bool) -> Self {
        let verb = if dry_run { "mapping" } else { "syncing" };
        Self {
            progress: Progress::spinner(&format!("{verb} {kind}")),
            tally: SyncSummary::new(kind, dry_run),
            echo_payloads,
            payloads: Vec::new(),
        }
    }

    #[must_use]
    pub const fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Dry-run payloads collected so far, tagged with their source id.
    pub fn take_payloads(&mut self) -> Vec<serde_json::Value> {
        std::mem::take(&mut self.payloads)
    }
}

impl SyncObserver for SyncProgress {
    fn on_record(&mut self, kind: EntityKind, outcome: &RecordOutcome) {
        self.tally.record(outcome);

        if let RecordOutcome::WouldCreate { source_id, payload } = outcome {
            if self.echo_payloads {
                let body = serde_json::to_string_pretty(payload).unwrap_or_default();
                self.progress
                    .println(&format!("would create {kind} {source_id}:\n{body}"));
            } else {
                self.payloads.push(serde_json::json!({
                    "source_id": source_id,
                    "payload": payload,
                }));
            }
        }

        self.progress.set_message(&format!(
            "{kind}: {} listed, {} created, {} skipped, {} failed",
            self.tally.listed,
            self.tally.created + self.tally.would_create,
            self.tally.skipped(),
            self.tally.failed,
        ));
    }
}

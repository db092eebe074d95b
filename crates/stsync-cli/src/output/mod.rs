//! Command output on stdout. Logs and progress go to stderr.

use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Text => render_text(&serde_json::to_value(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn render_text(value: &Value) -> anyhow::Result<String> {
    let max_width = ui::prefs().term_width;
    match value {
        Value::Array(rows) => Ok(render_rows(rows, max_width)),
        Value::Object(map) => {
            let rows: Vec<Vec<String>> = map
                .iter()
                .map(|(key, value)| vec![key.clone(), cell(value)])
                .collect();
            Ok(table::render(&["key", "value"], &rows, max_width))
        }
        scalar => Ok(cell(scalar)),
    }
}

fn render_rows(rows: &[Value], max_width: Option<usize>) -> String {
    if rows.is_empty() {
        return String::from("(no rows)");
    }
    if !rows.iter().all(Value::is_object) {
        return rows.iter().map(cell).collect::<Vec<_>>().join("\n");
    }

    let mut headers: Vec<&str> = Vec::new();
    for key in rows.iter().filter_map(Value::as_object).flat_map(|m| m.keys()) {
        if !headers.contains(&key.as_str()) {
            headers.push(key);
        }
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|h| map.get(*h).map_or_else(|| String::from("-"), cell))
                .collect()
        })
        .collect();

    table::render(&headers, &cells, max_width)
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::String(v) => v.clone(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use stsync_core::{EntityKind, SyncSummary};

    use super::render;
    use crate::cli::OutputFormat;

    #[test]
    fn json_render_is_valid_json() {
        let summary = SyncSummary::new(EntityKind::Items, true);
        let out = render(&summary, OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["kind"], "items");
        assert_eq!(parsed["dry_run"], true);
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let summary = SyncSummary::new(EntityKind::Pos, false);
        let out = render(&summary, OutputFormat::Raw).expect("raw render should work");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn text_render_of_summary_lists_counters() {
        let mut summary = SyncSummary::new(EntityKind::Jobs, false);
        summary.listed = 12;
        let out = render(&summary, OutputFormat::Text).expect("text render should work");
        assert!(out.lines().next().is_some_and(|line| line.contains("key")));
        assert!(out.lines().any(|line| line.starts_with("listed") && line.ends_with("12")));
    }

    #[test]
    fn text_render_of_rows_uses_first_seen_column_order() {
        let rows = json!([
            {"kind": "items", "source_id": "1", "target_id": "1001"},
            {"kind": "vendors", "source_id": "7", "target_id": "70"}
        ]);
        let out = render(&rows, OutputFormat::Text).expect("text render should work");
        let header = out.lines().next().unwrap();
        let kind_at = header.find("kind").unwrap();
        let target_at = header.find("target_id").unwrap();
        assert!(kind_at < target_at);
        assert_eq!(out.lines().count(), 4);
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let out = render(&json!([]), OutputFormat::Text).unwrap();
        assert_eq!(out, "(no rows)");
    }
}

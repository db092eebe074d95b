/// Render an aligned plain-text table. Numeric cells are right-aligned.
///
/// When `max_width` is set, the widest columns give up characters (never below
/// their header width) and long cells are cut with `…`.
#[must_use]
pub fn render(headers: &[&str], rows: &[Vec<String>], max_width: Option<usize>) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    if let Some(max_width) = max_width {
        shrink(&mut widths, headers, max_width);
    }

    let header_line = render_line(headers.iter().copied(), &widths);
    let divider = "-".repeat(header_line.chars().count());

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(header_line);
    lines.push(divider);
    for row in rows {
        lines.push(render_line(row.iter().map(String::as_str), &widths));
    }
    lines.join("\n")
}

fn render_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(value, width)| pad(&truncate(value, *width), *width, is_numeric(value)))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn shrink(widths: &mut [usize], headers: &[&str], max_width: usize) {
    let separators = widths.len().saturating_sub(1) * 2;
    while widths.iter().sum::<usize>() + separators > max_width {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(index, width)| **width > headers[*index].chars().count().max(4))
            .max_by_key(|(_, width)| **width)
            .map(|(index, _)| index);
        let Some(index) = widest else {
            break;
        };
        widths[index] -= 1;
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn pad(value: &str, width: usize, right_align: bool) -> String {
    if right_align {
        format!("{value:>width$}")
    } else {
        format!("{value:<width$}")
    }
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit() || c == '.')
}

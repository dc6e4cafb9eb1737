use std::fmt::Write;

use songvote_core::{score_label, ResultRow, RowView};

pub(crate) fn roster_table(rows: &[RowView]) -> String {
    let name_width = rows
        .iter()
        .map(|row| row.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:>5}  {:<name_width$}  {:>5}  {}",
        "#", "id", "name", "score", "advance"
    );
    for row in rows {
        let mut advance = row.advance.label.to_string();
        if row.advance.disabled {
            advance.push_str(" (blocked)");
        }
        let _ = write!(
            out,
            "{:>4}  {:>5}  {:<name_width$}  {:>5}  {}",
            row.ordinal,
            row.id,
            row.name,
            score_label(row.score),
            advance
        );
        if let Some(official) = row.official {
            let _ = write!(out, "  [{}]", official.label);
        }
        if row.reorderable {
            out.push_str("  ↕");
        }
        out.push('\n');
    }
    out
}

pub(crate) fn results_table(rows: &[ResultRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>4}  {:<24}  {:>6}  {:>5}  voters", "#", "name", "avg", "final");
    for (index, row) in rows.iter().enumerate() {
        let order = row.order.unwrap_or(index as i64 + 1);
        let _ = writeln!(
            out,
            "{:>4}  {:<24}  {:>6}  {:>5}  {}",
            order,
            row.name,
            row.average_label(),
            row.final_votes,
            row.voters_label()
        );
    }
    out
}

//! Human-readable summary renderer for change diffs.

use crate::diff::model::{ChangeKind, Changes, RowChange};

/// Render a Markdown summary of every change.
///
/// Used as the context block of assertion failures, so it lists each changed
/// row with all of its columns, touched or not.
pub fn render_changes_summary(changes: &Changes) -> String {
    let mut out = String::new();

    out.push_str("## Changes\n\n");
    out.push_str(&format!(
        "**Interval**: {} .. {}  \n**Total**: {} change(s) across {} table(s)\n\n",
        changes.start_taken_at.to_rfc3339(),
        changes.end_taken_at.to_rfc3339(),
        changes.change_count(),
        changes.tables.len(),
    ));

    if changes.is_empty() {
        out.push_str("_No changes detected._\n");
        return out;
    }

    for (table, rows) in &changes.tables {
        if rows.is_empty() {
            continue;
        }
        let count = |kind: ChangeKind| rows.iter().filter(|r| r.kind == kind).count();
        out.push_str(&format!(
            "### {} ({} created, {} modified, {} deleted)\n\n",
            table,
            count(ChangeKind::Creation),
            count(ChangeKind::Modification),
            count(ChangeKind::Deletion),
        ));
        for row in rows {
            out.push_str(&render_row_change(row));
            out.push('\n');
        }
    }

    out
}

/// Render one row change as a column table.
pub fn render_row_change(change: &RowChange) -> String {
    let mut out = format!(
        "#### {} {} {}\n\n| Column | Start | End | Touched |\n|---|---|---|---|\n",
        change.table, change.kind, change.primary_key
    );
    for delta in &change.columns {
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            delta.column,
            delta.start,
            delta.end,
            if delta.touched { "yes" } else { "" }
        ));
    }
    out
}

use tracing::debug;

use crate::pipeline::roles;
use crate::schema::Schema;
use crate::types::RawTable;

/// True when at least one cell reads like a column label (any role's exact
/// alias or partial pattern).
pub fn is_header_row(cells: &[String]) -> bool {
    cells
        .iter()
        .any(|cell| roles::matches_any_role(&cell.trim().to_lowercase()))
}

/// Guarantees the table has a header at row 0: a qualifying first row is
/// kept as-is, anything else gets the schema's canonical labels prepended,
/// assigned positionally up to the first row's width. Every originally
/// extracted row then counts as data.
pub fn resolve_header(mut table: RawTable, schema: Schema) -> RawTable {
    if table.is_empty() {
        return table;
    }
    if is_header_row(&table.rows[0]) {
        return table;
    }

    let width = table.rows[0].len();
    let labels = schema.canonical_labels();
    let header: Vec<String> = (0..width)
        .map(|idx| labels.get(idx).copied().unwrap_or("").to_string())
        .collect();
    debug!(width, "first row is not a header, synthesizing one");
    table.rows.insert(0, header);
    table
}
